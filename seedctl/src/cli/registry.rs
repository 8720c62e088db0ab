//! GitLab repositories, Docker images and application templates

use crate::app::output::Output;
use crate::app::state::AppState;
use crate::utils::format_date_time;

pub async fn repositories(app: &AppState, out: Output) -> anyhow::Result<()> {
    app.require_login().await?;
    let repos = app.http_client.all_repositories().await?;
    if out.json {
        out.print_json(&repos)?;
        return Ok(());
    }
    let rows = repos
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.path_with_namespace.clone(),
                r.default_branch.clone().unwrap_or_else(|| "-".to_string()),
                r.http_url_to_repo.clone(),
            ]
        })
        .collect();
    out.print_table(&["ID", "PATH", "DEFAULT BRANCH", "URL"], rows);
    Ok(())
}

pub async fn images(app: &AppState, out: Output, keyword: &str) -> anyhow::Result<()> {
    app.require_login().await?;
    let images = app.http_client.search_images(keyword).await?;
    if out.json {
        out.print_json(&images)?;
        return Ok(());
    }
    let rows = images
        .iter()
        .map(|i| {
            vec![
                i.repo_name.clone(),
                i.star_count.to_string(),
                if i.is_official { "official" } else { "" }.to_string(),
                i.short_description.clone(),
            ]
        })
        .collect();
    out.print_table(&["IMAGE", "STARS", "", "DESCRIPTION"], rows);
    Ok(())
}

pub async fn tags(app: &AppState, out: Output, image: &str) -> anyhow::Result<()> {
    app.require_login().await?;
    let tags = app.http_client.image_tags(image).await?;
    if out.json {
        out.print_json(&tags)?;
        return Ok(());
    }
    let rows = tags
        .iter()
        .map(|t| {
            vec![
                t.name.clone(),
                t.last_updated
                    .as_deref()
                    .and_then(format_date_time)
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    out.print_table(&["TAG", "UPDATED"], rows);
    Ok(())
}

pub async fn applications(app: &AppState, out: Output, keyword: &str) -> anyhow::Result<()> {
    app.require_login().await?;
    let templates = app.http_client.search_applications(keyword).await?;
    if out.json {
        out.print_json(&templates)?;
        return Ok(());
    }
    let rows = templates
        .iter()
        .map(|t| {
            let ports: Vec<String> = t.default_ports.iter().map(u16::to_string).collect();
            vec![
                t.image_name.clone(),
                ports.join(","),
                t.description.clone(),
            ]
        })
        .collect();
    out.print_table(&["IMAGE", "PORTS", "DESCRIPTION"], rows);
    Ok(())
}
