//! Formatting and object-lifetime core of a log4j-style logging pipeline,
//! ported from Log4Qt.
//!
//! Two pieces live here. Layouts turn logging events into text behind one
//! polymorphic contract ([`Layout`], with [`XmlLayout`] producing the log4j
//! XML element stream). Shared handles ([`SharedHandle`] / [`WeakHandle`])
//! give those components reference-counted ownership across threads while
//! guaranteeing that destruction runs exactly once and only on the owning
//! execution context ([`Context`]).

#[macro_use]
extern crate quick_error;

pub mod component;
pub mod context;
pub mod event;
pub mod factory;
pub mod handle;
pub mod layout;
pub mod registry;
mod severity;
mod thread;

pub use crate::component::{Component, ComponentBase};
pub use crate::context::{Context, ContextHandle};
pub use crate::event::LoggingEvent;
pub use crate::handle::{SharedHandle, WeakHandle};
pub use crate::layout::{Layout, LayoutBase, LayoutHandle, XmlLayout};
pub use crate::registry::{Config, Registry};
pub use crate::severity::Severity;
