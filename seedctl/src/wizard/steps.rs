//! Wizard step descriptors and navigation

use std::collections::HashSet;

use thiserror::Error;

use crate::wizard::state::WizardState;

/// Why the current step cannot be left yet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Application #{index}: {field} is required")]
    MissingAppField { index: usize, field: &'static str },

    #[error("Invalid IP address '{0}': expected four numbers between 0 and 255")]
    InvalidIp(String),

    #[error("Port {0} is used by more than one application")]
    DuplicatePort(u16),

    #[error("{0} file has not been selected")]
    MissingFile(&'static str),
}

pub type Validator = fn(&WizardState) -> Result<(), StepError>;

/// One page of the wizard
#[derive(Debug, Clone, Copy)]
pub struct StepDescriptor {
    pub id: u8,
    pub slug: &'static str,
    pub label: &'static str,
    pub validate: Validator,
}

/// Label shown for an unknown step
const DEFAULT_LABEL: &str = "Basic information";

/// Steps with forward progress; the confirmation page is not counted
const PROGRESS_STEPS: u8 = 4;

pub static STEPS: [StepDescriptor; 5] = [
    StepDescriptor {
        id: 1,
        slug: "gitlab",
        label: "Repository",
        validate: validate_source,
    },
    StepDescriptor {
        id: 2,
        slug: "server",
        label: "Server",
        validate: validate_server,
    },
    StepDescriptor {
        id: 3,
        slug: "app",
        label: "Applications",
        validate: validate_apps,
    },
    StepDescriptor {
        id: 4,
        slug: "env",
        label: "Environment",
        validate: validate_env,
    },
    StepDescriptor {
        id: 5,
        slug: "complete",
        label: "Confirmation",
        validate: validate_all,
    },
];

pub fn step_by_id(id: u8) -> Option<&'static StepDescriptor> {
    STEPS.iter().find(|step| step.id == id)
}

/// Step for a slug, falling back to the first step
pub fn step_by_slug(slug: &str) -> &'static StepDescriptor {
    STEPS.iter().find(|step| step.slug == slug).unwrap_or(&STEPS[0])
}

/// Slug for a step, falling back to the first step's
pub fn slug_for(id: u8) -> &'static str {
    step_by_id(id).map(|step| step.slug).unwrap_or(STEPS[0].slug)
}

pub fn label_for(id: u8) -> &'static str {
    step_by_id(id).map(|step| step.label).unwrap_or(DEFAULT_LABEL)
}

fn require(value: &str, field: &'static str) -> Result<(), StepError> {
    if value.trim().is_empty() {
        return Err(StepError::MissingField { field });
    }
    Ok(())
}

pub fn validate_source(state: &WizardState) -> Result<(), StepError> {
    require(&state.source.repo_url, "Repository")?;
    require(&state.source.client_name, "Frontend name")?;
    require(&state.source.server_name, "Backend name")
}

pub fn validate_server(state: &WizardState) -> Result<(), StepError> {
    if !is_valid_ipv4(&state.server.ip) {
        return Err(StepError::InvalidIp(state.server.ip.clone()));
    }
    if state.server.pem.is_none() {
        return Err(StepError::MissingFile("PEM key"));
    }
    Ok(())
}

pub fn validate_apps(state: &WizardState) -> Result<(), StepError> {
    for (i, app) in state.apps.iter().enumerate() {
        if app.image_name.trim().is_empty() {
            return Err(StepError::MissingAppField {
                index: i + 1,
                field: "image name",
            });
        }
        if app.tag.trim().is_empty() {
            return Err(StepError::MissingAppField {
                index: i + 1,
                field: "tag",
            });
        }
    }

    let mut seen = HashSet::new();
    for app in &state.apps {
        if !seen.insert(app.port) {
            return Err(StepError::DuplicatePort(app.port));
        }
    }
    Ok(())
}

pub fn validate_env(state: &WizardState) -> Result<(), StepError> {
    let env = &state.env;
    require(&env.frontend_framework, "Frontend framework")?;
    require(&env.node, "Node.js version")?;
    require(&env.jdk, "JDK version")?;
    require(&env.build_tool, "Build tool")?;
    if env.front_env.is_none() {
        return Err(StepError::MissingFile("Frontend .env"));
    }
    if env.back_env.is_none() {
        return Err(StepError::MissingFile("Backend .env"));
    }
    Ok(())
}

/// Fields sent when editing an existing project. The PEM key stays on the
/// server, so only the address and the applications are checked.
pub fn validate_edit(state: &WizardState) -> Result<(), StepError> {
    if !is_valid_ipv4(&state.server.ip) {
        return Err(StepError::InvalidIp(state.server.ip.clone()));
    }
    validate_apps(state)
}

/// Every step before confirmation
pub fn validate_all(state: &WizardState) -> Result<(), StepError> {
    STEPS
        .iter()
        .filter(|step| step.id <= PROGRESS_STEPS)
        .try_for_each(|step| (step.validate)(state))
}

/// Four dot-separated, non-empty decimal octets no greater than 255
fn is_valid_ipv4(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            !part.is_empty()
                && part.len() <= 3
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u16>().map(|n| n <= 255).unwrap_or(false)
        })
}

/// Position within the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wizard {
    current: u8,
}

impl Default for Wizard {
    fn default() -> Self {
        Self { current: STEPS[0].id }
    }
}

impl Wizard {
    /// Start at `id`, clamped to the known steps
    pub fn at(id: u8) -> Self {
        let last = STEPS[STEPS.len() - 1].id;
        Self {
            current: id.clamp(STEPS[0].id, last),
        }
    }

    pub fn current_id(&self) -> u8 {
        self.current
    }

    pub fn current(&self) -> &'static StepDescriptor {
        step_by_id(self.current).unwrap_or(&STEPS[0])
    }

    pub fn is_last(&self) -> bool {
        self.current == STEPS[STEPS.len() - 1].id
    }

    /// Validate the current step and move forward on success
    pub fn next(&mut self, state: &WizardState) -> Result<&'static StepDescriptor, StepError> {
        (self.current().validate)(state)?;
        if !self.is_last() {
            self.current += 1;
        }
        Ok(self.current())
    }

    /// Move back without validating
    pub fn prev(&mut self) -> &'static StepDescriptor {
        if self.current > STEPS[0].id {
            self.current -= 1;
        }
        self.current()
    }

    /// Move to step `id`. Going forward validates each step passed; on
    /// failure the wizard stops at the step that failed.
    pub fn goto(&mut self, id: u8, state: &WizardState) -> Result<&'static StepDescriptor, StepError> {
        let target = Wizard::at(id).current;
        while self.current < target {
            self.next(state)?;
        }
        while self.current > target {
            self.prev();
        }
        Ok(self.current())
    }

    pub fn progress_percent(&self) -> u8 {
        let percent = u16::from(self.current) * 100 / u16::from(PROGRESS_STEPS);
        percent.min(100) as u8
    }
}
