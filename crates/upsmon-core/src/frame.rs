/// Literal marker the controller firmware prepends to telemetry lines.
pub const FRAME_PREFIX: &str = "UPS_JSON:";

/// Returns the payload following [`FRAME_PREFIX`], or `None` when the line
/// carries no frame. Most wire traffic is unrelated diagnostic text, so a
/// missing prefix is expected and never an error.
pub fn extract_frame(line: &str) -> Option<&str> {
    line.strip_prefix(FRAME_PREFIX)
}
