//! UI layer for the desktop widget.

pub mod app;

pub use app::SocialSyncApp;
