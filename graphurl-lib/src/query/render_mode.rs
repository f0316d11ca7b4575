use clap::ValueEnum;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

/// Backend endpoint a query URL is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, ValueEnum, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Returns a rendered graph image
    Render,

    /// Returns an interactive graph-editing page
    Composer,
}
