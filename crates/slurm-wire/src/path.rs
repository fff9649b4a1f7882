//! REST path builders.
//!
//! Controller resources live under `/slurm/{version}` and accounting
//! resources under `/slurmdb/{version}`. Path segments are percent-encoded.

/// Path of a controller resource, e.g. `slurm("v0.0.42", &["job", "17"])`.
#[must_use]
pub fn slurm(version: &str, segments: &[&str]) -> String {
    build("slurm", version, segments)
}

/// Path of an accounting resource.
#[must_use]
pub fn slurmdb(version: &str, segments: &[&str]) -> String {
    build("slurmdb", version, segments)
}

fn build(plugin: &str, version: &str, segments: &[&str]) -> String {
    let mut path = format!("/{plugin}/{version}");
    for segment in segments {
        path.push('/');
        path.push_str(&encode_segment(segment));
    }
    path
}

fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
