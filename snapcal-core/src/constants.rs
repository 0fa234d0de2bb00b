/// Product name written into PRODID (`-//<name>//EN`)
pub const DEFAULT_PRODUCT_NAME: &str = "snapcal";

/// Domain part of generated UIDs
pub const DEFAULT_UID_NAMESPACE: &str = "snapcal";

/// MIME type for generated calendar files
pub const ICS_MIME_TYPE: &str = "text/calendar";

/// Maximum octets per content line before folding (RFC 5545 §3.1)
pub const MAX_LINE_OCTETS: usize = 75;

/// Event length used when the model gives a start but no end
pub const DEFAULT_EVENT_DURATION: &str = "1h";
