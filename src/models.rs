use chrono::NaiveDate;
use serde::Deserialize;

use crate::dates::parse_date;
use crate::error::Result;
use crate::link::LinkTarget;

#[derive(Deserialize, Debug, Clone)]
pub struct FrontMatter {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    pub edited_at: String,
}

/// Post thumbnail. Always displayed at a fixed 80x80.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: String,
}

impl ImageRef {
    pub const WIDTH: u32 = 80;
    pub const HEIGHT: u32 = 80;
}

#[derive(Debug, Clone)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub image: ImageRef,
    pub edited_at: NaiveDate,
    /// Rendered HTML body; only internal posts carry one.
    pub body: Option<String>,
}

impl Post {
    pub fn from_front_matter(front_matter: FrontMatter, body: Option<String>) -> Result<Self> {
        Ok(Post {
            edited_at: parse_date(&front_matter.edited_at)?,
            slug: front_matter.slug,
            title: front_matter.title,
            description: front_matter.description,
            image: ImageRef {
                src: front_matter.image,
            },
            body,
        })
    }

    pub fn link_target(&self) -> LinkTarget {
        LinkTarget::classify(&self.slug)
    }
}
