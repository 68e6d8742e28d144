pub mod aligned;
pub mod hub;

pub use aligned::save_newsela_to_disk;
pub use hub::save_turk_to_disk;

/// Collapse characters that would break the tab-separated layout.
pub(crate) fn sanitize_field(s: &str) -> String {
    s.trim().replace('\t', " ").replace('\n', " ").replace('\r', " ")
}
