use std::io::Write;

use crate::component::{Component, ComponentBase};
use crate::context::ContextHandle;
use crate::event::LoggingEvent;
use crate::severity::Severity;

use super::{Error, Layout, LayoutBase};

/// Formats events as a log4j-compatible XML element stream.
///
/// Each call to `format` emits one self-contained `log4j:event` fragment and
/// nothing else: no prolog and no document root. Wrapping the stream into a
/// document is the appender's business via `header`/`footer`, both of which
/// this layout leaves empty.
pub struct XmlLayout {
    base: LayoutBase,
}

impl XmlLayout {
    pub fn new(owner: &ContextHandle) -> XmlLayout {
        XmlLayout {
            base: LayoutBase::new(owner),
        }
    }
}

impl Component for XmlLayout {
    fn component(&self) -> &ComponentBase {
        self.base.component()
    }

    fn component_mut(&mut self) -> &mut ComponentBase {
        self.base.component_mut()
    }
}

impl Layout for XmlLayout {
    fn layout(&self) -> &LayoutBase {
        &self.base
    }

    fn layout_mut(&mut self) -> &mut LayoutBase {
        &mut self.base
    }

    fn content_type(&self) -> &'static str {
        "text/xml"
    }

    fn format(&self, event: &LoggingEvent, wr: &mut dyn Write) -> Result<(), Error> {
        let mut xml = XmlWriter::new(wr);

        xml.start_element("log4j:event")?;
        xml.attribute("logger", event.logger())?;
        xml.attribute("timestamp", &event.timestamp_millis().to_string())?;
        xml.attribute("level", event.level().as_str())?;
        xml.attribute("thread", event.thread())?;

        xml.start_element("log4j:message")?;
        xml.cdata(event.message())?;
        xml.end_element()?;

        if !event.ndc().is_empty() {
            xml.start_element("log4j:NDC")?;
            xml.cdata(event.ndc())?;
            xml.end_element()?;
        }

        if !event.properties().is_empty() {
            xml.start_element("log4j:properties")?;
            for (name, value) in event.properties() {
                xml.start_element("log4j:data")?;
                xml.attribute("name", name)?;
                xml.attribute("value", value)?;
                xml.end_element()?;
            }
            xml.end_element()?;
        }

        xml.end_element()?;

        Ok(())
    }
}

/// A minimal streaming XML fragment writer.
///
/// Output is built incrementally as elements open and close, which keeps the
/// escaping decisions local: attribute values are entity-escaped, text bodies
/// go out as CDATA with the terminator sequence split. Elements without
/// children self-close, matching the stream-writer output the log4j XML
/// consumers expect.
struct XmlWriter<'a> {
    wr: &'a mut dyn Write,
    open: Vec<&'static str>,
    tag_pending: bool,
}

impl<'a> XmlWriter<'a> {
    fn new(wr: &'a mut dyn Write) -> XmlWriter<'a> {
        XmlWriter {
            wr,
            open: Vec::with_capacity(4),
            tag_pending: false,
        }
    }

    fn start_element(&mut self, name: &'static str) -> Result<(), Error> {
        self.seal_tag()?;
        write!(self.wr, "<{}", name)?;
        self.open.push(name);
        self.tag_pending = true;

        Ok(())
    }

    /// Valid only between `start_element` and the first child or `end_element`.
    fn attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        debug_assert!(self.tag_pending, "attribute written outside a start tag");
        write!(self.wr, " {}=\"", name)?;
        self.escaped(value)?;
        self.wr.write_all(b"\"")?;

        Ok(())
    }

    fn cdata(&mut self, text: &str) -> Result<(), Error> {
        self.seal_tag()?;
        self.wr.write_all(b"<![CDATA[")?;

        // A literal "]]>" inside the body would terminate the section early.
        // End the section after "]]" and reopen before ">", so the parser
        // reassembles the original text.
        let mut pieces = text.split("]]>");
        if let Some(first) = pieces.next() {
            self.neutralized(first)?;
        }
        for piece in pieces {
            self.wr.write_all(b"]]]]><![CDATA[>")?;
            self.neutralized(piece)?;
        }

        self.wr.write_all(b"]]>")?;

        Ok(())
    }

    fn end_element(&mut self) -> Result<(), Error> {
        let name = self.open.pop().expect("end_element without start_element");

        if self.tag_pending {
            self.wr.write_all(b"/>")?;
            self.tag_pending = false;
        } else {
            write!(self.wr, "</{}>", name)?;
        }

        Ok(())
    }

    fn seal_tag(&mut self) -> Result<(), Error> {
        if self.tag_pending {
            self.wr.write_all(b">")?;
            self.tag_pending = false;
        }

        Ok(())
    }

    /// Entity-escapes an attribute value. Characters XML 1.0 forbids outright
    /// are substituted rather than failing the event.
    fn escaped(&mut self, value: &str) -> Result<(), Error> {
        for c in value.chars() {
            match c {
                '&' => self.wr.write_all(b"&amp;")?,
                '<' => self.wr.write_all(b"&lt;")?,
                '>' => self.wr.write_all(b"&gt;")?,
                '"' => self.wr.write_all(b"&quot;")?,
                '\t' => self.wr.write_all(b"&#9;")?,
                '\n' => self.wr.write_all(b"&#10;")?,
                '\r' => self.wr.write_all(b"&#13;")?,
                c if is_illegal_xml(c) => {
                    write!(self.wr, "{}", char::REPLACEMENT_CHARACTER)?
                }
                c => write!(self.wr, "{}", c)?,
            }
        }

        Ok(())
    }

    /// Writes CDATA text verbatim, substituting characters XML 1.0 forbids.
    fn neutralized(&mut self, text: &str) -> Result<(), Error> {
        for c in text.chars() {
            if is_illegal_xml(c) {
                write!(self.wr, "{}", char::REPLACEMENT_CHARACTER)?;
            } else {
                write!(self.wr, "{}", c)?;
            }
        }

        Ok(())
    }
}

/// XML 1.0 forbids most C0 controls even as character references.
fn is_illegal_xml(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}')
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use log::Level;

    use super::XmlLayout;
    use crate::context::Context;
    use crate::event::LoggingEvent;
    use crate::layout::Layout;

    fn fixture(message: &str) -> LoggingEvent {
        LoggingEvent::new("app.Main", Level::Info, message)
            .with_timestamp(Utc.timestamp_millis_opt(1000).unwrap())
            .with_thread("main")
    }

    #[test]
    fn content_type_is_xml() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        assert_eq!("text/xml", layout.content_type());
    }

    #[test]
    fn plain_event() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let out = layout.format_str(&fixture("hello")).unwrap();

        assert_eq!(
            "<log4j:event logger=\"app.Main\" timestamp=\"1000\" level=\"INFO\" thread=\"main\">\
             <log4j:message><![CDATA[hello]]></log4j:message>\
             </log4j:event>",
            out
        );
    }

    #[test]
    fn ndc_is_emitted_only_when_non_empty() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let without = layout.format_str(&fixture("hello")).unwrap();
        assert!(!without.contains("log4j:NDC"));

        let with = layout
            .format_str(&fixture("hello").with_ndc("request 42"))
            .unwrap();
        assert!(with.contains("<log4j:NDC><![CDATA[request 42]]></log4j:NDC>"));
    }

    #[test]
    fn properties_are_emitted_in_insertion_order() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let event = fixture("hello")
            .with_property("user", "bob")
            .with_property("req", "42");
        let out = layout.format_str(&event).unwrap();

        assert!(out.contains(
            "<log4j:properties>\
             <log4j:data name=\"user\" value=\"bob\"/>\
             <log4j:data name=\"req\" value=\"42\"/>\
             </log4j:properties>"
        ));
    }

    #[test]
    fn empty_properties_are_omitted() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let out = layout.format_str(&fixture("hello")).unwrap();

        assert!(!out.contains("log4j:properties"));
        assert!(!out.contains("log4j:data"));
    }

    #[test]
    fn single_property_yields_single_data_element() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let event = fixture("hello").with_property("user", "bob");
        let out = layout.format_str(&event).unwrap();

        assert_eq!(1, out.matches("<log4j:data").count());
    }

    #[test]
    fn cdata_terminator_is_split() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let out = layout.format_str(&fixture("a]]>b")).unwrap();

        assert!(out.contains("<log4j:message><![CDATA[a]]]]><![CDATA[>b]]></log4j:message>"));
    }

    #[test]
    fn consecutive_cdata_terminators_are_split() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let out = layout.format_str(&fixture("]]>]]>")).unwrap();

        assert!(out.contains(
            "<![CDATA[]]]]><![CDATA[>]]]]><![CDATA[>]]>"
        ));
    }

    #[test]
    fn attributes_are_entity_escaped() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let event = LoggingEvent::new("a<b>&\"c", Level::Warn, "hello")
            .with_timestamp(Utc.timestamp_millis_opt(1000).unwrap())
            .with_thread("main")
            .with_property("key", "line1\nline2");
        let out = layout.format_str(&event).unwrap();

        assert!(out.contains("logger=\"a&lt;b&gt;&amp;&quot;c\""));
        assert!(out.contains("value=\"line1&#10;line2\""));
    }

    #[test]
    fn illegal_characters_are_neutralized_not_fatal() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());

        let event = fixture("bell\u{7} and null\u{0}").with_property("ctl", "\u{b}");
        let out = layout.format_str(&event).unwrap();

        assert!(out.contains("bell\u{fffd} and null\u{fffd}"));
        assert!(out.contains("value=\"\u{fffd}\""));
    }

    #[test]
    fn format_is_idempotent() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());
        let event = fixture("hello")
            .with_ndc("ctx")
            .with_property("user", "bob");

        let first = layout.format_str(&event).unwrap();
        let second = layout.format_str(&event).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn fragment_has_balanced_markup() {
        let context = Context::new();
        let layout = XmlLayout::new(&context.handle());
        let event = fixture("a]]>b")
            .with_ndc("nested]]>ndc")
            .with_property("user", "bob");

        let out = layout.format_str(&event).unwrap();

        assert_eq!(1, out.matches("<log4j:event").count());
        assert_eq!(1, out.matches("</log4j:event>").count());
        assert_eq!(
            out.matches("<![CDATA[").count(),
            out.matches("]]>").count()
        );
    }
}
