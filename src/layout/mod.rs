use std::io::Write;
use std::string::FromUtf8Error;

use crate::component::{Component, ComponentBase};
use crate::context::ContextHandle;
use crate::event::LoggingEvent;
use crate::handle::SharedHandle;

mod xml;

pub use self::xml::XmlLayout;

/// A shared, reference-counted layout behind the polymorphic contract.
pub type LayoutHandle = SharedHandle<Box<dyn Layout>>;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Io(err: std::io::Error) {
            from()
            display("i/o error: {}", err)
        }
        Utf8(err: FromUtf8Error) {
            from()
            display("formatted output is not valid utf-8: {}", err)
        }
        /// Invalid or missing layout state, detected at `activate_options`
        /// or construction time. Reported once by the caller, never per
        /// event.
        Config(msg: String) {
            display("invalid layout configuration: {}", msg)
        }
    }
}

/// State shared by every layout: component identity plus the header and
/// footer emitted by the appender once per stream, never per event.
pub struct LayoutBase {
    component: ComponentBase,
    header: String,
    footer: String,
}

impl LayoutBase {
    pub fn new(owner: &ContextHandle) -> LayoutBase {
        LayoutBase {
            component: ComponentBase::new(owner),
            header: String::new(),
            footer: String::new(),
        }
    }

    pub fn component(&self) -> &ComponentBase {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut ComponentBase {
        &mut self.component
    }
}

/// The base contract for all layouts.
///
/// A layout has exactly two phases. During configuration the setters and
/// [`Layout::activate_options`] may run; after that the instance is published
/// (typically behind a [`LayoutHandle`]) and only read. `format` may then be
/// called from any number of threads simultaneously: it is a pure function of
/// the event and the frozen configuration, performs no I/O of its own and
/// takes no locks. Overlapping a setter with concurrent `format` calls is the
/// caller's bug; the trait deliberately provides no synchronization for it.
pub trait Layout: Component + Send + Sync {
    fn layout(&self) -> &LayoutBase;
    fn layout_mut(&mut self) -> &mut LayoutBase;

    /// Formats one event into the given writer.
    ///
    /// Data-content problems (characters illegal in the output encoding) are
    /// neutralized, not reported: losing a malformed line beats losing the
    /// pipeline. Only structural configuration problems surface as errors.
    fn format(&self, event: &LoggingEvent, wr: &mut dyn Write) -> Result<(), Error>;

    /// Formats one event into a freshly allocated string.
    fn format_str(&self, event: &LoggingEvent) -> Result<String, Error> {
        let mut buf = Vec::with_capacity(256);
        self.format(event, &mut buf)?;

        Ok(String::from_utf8(buf)?)
    }

    /// Emitted by the appender exactly once at stream open.
    fn header(&self) -> &str {
        &self.layout().header
    }

    /// Emitted by the appender exactly once at stream close.
    fn footer(&self) -> &str {
        &self.layout().footer
    }

    /// Configuration phase only.
    fn set_header(&mut self, header: &str) {
        self.layout_mut().header = header.into();
    }

    /// Configuration phase only.
    fn set_footer(&mut self, footer: &str) {
        self.layout_mut().footer = footer.into();
    }

    /// MIME type of the produced output.
    fn content_type(&self) -> &'static str {
        "text/plain"
    }

    /// Hook invoked once after all configuration setters have run and before
    /// the first `format` call. Layouts may precompute derived formatting
    /// state here.
    fn activate_options(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Returns the end of line separator for the operating system.
///
/// Windows: `\r\n`, Mac: `\r`, UNIX: `\n`.
pub fn end_of_line() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else if cfg!(target_os = "macos") {
        "\r"
    } else {
        "\n"
    }
}
