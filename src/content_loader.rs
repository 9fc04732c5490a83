use std::collections::HashSet;
use std::path::Path;

use gray_matter::{engine::YAML, Matter};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::markdown::render_markdown_to_html;
use crate::models::{FrontMatter, Post};
use crate::state::AppState;

/// Everything read from the content directory.
#[derive(Debug, Clone)]
pub struct Content {
    pub site: SiteConfig,
    pub layout_html: String,
    pub not_found_html: String,
    pub posts: Vec<Post>,
}

impl Content {
    /// Internal post served at `/{name}`.
    pub fn find_internal(&self, name: &str) -> Option<&Post> {
        self.posts.iter().find(|post| {
            !post.link_target().is_external() && post.slug.trim_start_matches('/') == name
        })
    }
}

pub async fn load_content(dir: &Path) -> Result<Content> {
    let site = SiteConfig::parse(&fs::read_to_string(dir.join("site.toml")).await?)?;
    let layout_html = fs::read_to_string(dir.join("layout.html")).await?;
    let not_found_html = fs::read_to_string(dir.join("not_found.html")).await?;
    let posts = load_posts(&dir.join("posts")).await?;

    Ok(Content {
        site,
        layout_html,
        not_found_html,
        posts,
    })
}

async fn load_posts(dir: &Path) -> Result<Vec<Post>> {
    let mut posts: Vec<Post> = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            let file_content = match fs::read_to_string(&path).await {
                Ok(raw) => raw,
                Err(e) => {
                    error!(path = %path.display(), "Skipping post: {}", e);
                    continue;
                }
            };
            match parse_post(&path, &file_content) {
                Ok(post) => {
                    debug!(slug = %post.slug, "Loaded post");
                    posts.push(post);
                }
                Err(e) => error!("Skipping post: {}", e),
            }
        }
    }

    order_posts(&mut posts);
    warn_duplicate_slugs(&posts);
    Ok(posts)
}

pub fn parse_post(path: &Path, raw: &str) -> Result<Post> {
    let matter = Matter::<YAML>::new();
    let parsed = matter
        .parse::<FrontMatter>(raw)
        .map_err(|e| Error::FrontMatter {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let front_matter = parsed.data.ok_or_else(|| Error::FrontMatter {
        path: path.to_path_buf(),
        message: "missing front matter".to_string(),
    })?;

    let body = if parsed.content.trim().is_empty() {
        None
    } else {
        Some(render_markdown_to_html(&parsed.content))
    };

    Post::from_front_matter(front_matter, body)
}

/// Newest first, then by slug so the order never depends on the directory.
pub fn order_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.edited_at
            .cmp(&a.edited_at)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

fn warn_duplicate_slugs(posts: &[Post]) {
    let mut seen = HashSet::new();
    for post in posts {
        if !seen.insert(post.slug.as_str()) {
            warn!(slug = %post.slug, "Duplicate post slug; rows will collide");
        }
    }
}

/// Swaps in freshly loaded content. On failure the old content stays.
pub async fn reload_content(app_state: &AppState) {
    info!("Reloading application content...");
    match load_content(&app_state.content_dir).await {
        Ok(content) => {
            *app_state.content.write().await = content;
            info!("Content successfully reloaded.");
        }
        Err(e) => {
            error!("Failed to reload content: {}", e);
        }
    }
}
