// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only setup in main.rs.
pub mod app;
pub mod form;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod store;
pub mod ui;
pub mod view_model;
pub mod week;
