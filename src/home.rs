use chrono::NaiveDate;
use htmlescape::encode_minimal;

use crate::config::SiteConfig;
use crate::dates::copyright_range;
use crate::models::Post;
use crate::row::{render_row, PostRow};

/// One row per post, in the order given. Rows are keyed by slug; slugs are
/// expected to be unique.
pub fn render_post_list(posts: &[Post]) -> String {
    let mut list_items = String::new();
    for post in posts {
        list_items.push_str(&render_row(post, &PostRow::new()));
    }
    format!(
        "<ul class=\"divide-y divide-gray7 divide-dashed\">{}</ul>",
        list_items
    )
}

fn render_social_links(site: &SiteConfig) -> String {
    site.social
        .iter()
        .map(|link| {
            format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>",
                encode_minimal(&link.url),
                encode_minimal(&link.label)
            )
        })
        .collect()
}

fn render_subscribe(site: &SiteConfig) -> String {
    format!(
        "<a class=\"subscribe\" href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>",
        encode_minimal(&site.subscribe_url),
        encode_minimal(&site.subscribe_label)
    )
}

pub fn render_sidebar(site: &SiteConfig, today: NaiveDate) -> String {
    let author = encode_minimal(&site.author);
    let byline = match &site.author_url {
        Some(url) => format!(
            "<a class=\"underline underline-offset-2\" href=\"{}\">{}.</a>",
            encode_minimal(url),
            author
        ),
        None => format!("{}.", author),
    };

    format!(
        concat!(
            "<aside class=\"p-6 pt-12 lg:p-10 border-gray8 top-0 flex flex-col gap-6 relative bg-gray4 border-b lg:border-b-0 lg:border-r-0 lg:sticky lg:h-screen\">",
            "<h1 class=\"font-serif text-[64px] leading-[1]\">{author}</h1>",
            "<div class=\"md:flex lg:block lg:space-y-8 space-y-6 md:space-y-0 items-center justify-between\">",
            "<p class=\"leading-relaxed\">{tagline} by {byline}</p>",
            "{subscribe}",
            "</div>",
            "<footer class=\"mt-auto flex justify-between items-end text-gray11\">",
            "<div class=\"flex items-center gap-3\">{social}</div>",
            "<p class=\"text-xs text-gray10 font-mono\">{copyright}</p>",
            "</footer>",
            "</aside>"
        ),
        author = author,
        tagline = encode_minimal(&site.tagline),
        byline = byline,
        subscribe = render_subscribe(site),
        social = render_social_links(site),
        copyright = copyright_range(site.since, today),
    )
}

/// Home page body: sidebar next to the post list.
pub fn render_home(site: &SiteConfig, posts: &[Post], today: NaiveDate) -> String {
    format!(
        concat!(
            "<div class=\"lg:grid grid-cols-[320px_1fr] bg-gray4 md:border-x border-gray8 relative\">",
            "{}",
            "<div class=\"bg-gray4 lg:border-l border-gray8\">{}</div>",
            "</div>"
        ),
        render_sidebar(site, today),
        render_post_list(posts)
    )
}
