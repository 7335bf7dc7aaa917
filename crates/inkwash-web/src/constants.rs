// Front-end wiring constants

// Class added to the canvas when the effect is off (reduced motion, no GPU)
pub const DISABLED_CLASS: &str = "inkwash-disabled";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
