//! Export core modules shared by the CLI report writer.

pub mod pdf_core;
