use log::Level;
use serde_json::json;

use quartzlog::{Context, Layout, LoggingEvent, Registry, SharedHandle};

fn main() {
    // Layouts belong to an execution context; its worker thread is where the
    // layout will eventually be destroyed, no matter who drops the last
    // reference.
    let context = Context::new();

    // Construct a layout from a generic configuration value.
    let registry = Registry::new();
    let layout = registry
        .layout(
            &json!({
                "type": "xml",
                "name": "wire",
                "header": "<log4j:eventSet>",
                "footer": "</log4j:eventSet>",
            }),
            &context.handle(),
        )
        .unwrap();

    // Share it the way an appender would hold it.
    let layout = SharedHandle::wrap(layout);

    // An appender brackets the stream with the header and footer once, and
    // formats each event in between.
    println!("{}", layout.header());

    let event = LoggingEvent::new("app.Main", Level::Info, "hello")
        .with_ndc("startup")
        .with_property("user", "bob");
    println!("{}", layout.format_str(&event).unwrap());

    println!("{}", layout.footer());
}
