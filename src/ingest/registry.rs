// src/ingest/registry.rs
use crate::ingest::types::{ShapeHint, SourceDescriptor};

const GREENHOUSE_BOARDS: &str = "https://boards-api.greenhouse.io/v1/boards";

/// Built-in boards, polled in this order.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new("RemoteOK", "https://remoteok.com/api", ShapeHint::Api),
        SourceDescriptor::new("GitLab", "https://jobs.gitlab.com/jobs", ShapeHint::Html),
        greenhouse("Postman", "postman"),
        greenhouse("Twilio", "twilio"),
        greenhouse("MongoDB", "mongodb"),
    ]
}

fn greenhouse(name: &str, slug: &str) -> SourceDescriptor {
    SourceDescriptor::new(name, format!("{GREENHOUSE_BOARDS}/{slug}/jobs"), ShapeHint::Api)
}

/// "RemoteOK, GitLab, ..." for the rendered footer.
pub fn source_names(sources: &[SourceDescriptor]) -> String {
    sources
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greenhouse_urls_follow_board_slug() {
        let srcs = default_sources();
        assert_eq!(srcs.len(), 5);
        assert_eq!(
            srcs[2].url,
            "https://boards-api.greenhouse.io/v1/boards/postman/jobs"
        );
        assert_eq!(srcs[1].shape, ShapeHint::Html);
    }

    #[test]
    fn names_are_joined_in_order() {
        assert_eq!(
            source_names(&default_sources()),
            "RemoteOK, GitLab, Postman, Twilio, MongoDB"
        );
    }
}
