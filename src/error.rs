use std::fmt;
use std::path::PathBuf;

/// Result type for content loading and serving
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Reading the content directory or binding the listener failed
    Io(std::io::Error),

    /// A post file has missing or unreadable front matter
    FrontMatter { path: PathBuf, message: String },

    /// An `edited_at` value is not a `YYYY-MM-DD` date
    Date {
        value: String,
        source: chrono::ParseError,
    },

    /// `site.toml` could not be parsed
    Config(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::FrontMatter { path, message } => {
                write!(f, "Invalid front matter in {}: {}", path.display(), message)
            }
            Error::Date { value, source } => {
                write!(f, "Invalid date '{}' (expected YYYY-MM-DD): {}", value, source)
            }
            Error::Config(err) => write!(f, "Invalid site config: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FrontMatter { .. } => None,
            Error::Date { source, .. } => Some(source),
            Error::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_error_names_the_bad_value() {
        let source = chrono::NaiveDate::parse_from_str("2021-13-40", "%Y-%m-%d").unwrap_err();
        let err = Error::Date {
            value: "2021-13-40".to_string(),
            source,
        };

        let msg = err.to_string();
        assert!(msg.contains("'2021-13-40'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_front_matter_error_includes_path() {
        let err = Error::FrontMatter {
            path: PathBuf::from("content/posts/broken.md"),
            message: "missing front matter".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Invalid front matter in content/posts/broken.md: missing front matter"
        );
    }
}
