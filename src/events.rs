//! Named event channels and the listener registry
//!
//! Listeners subscribe by channel name. Unknown names are accepted and
//! ignored so pages can register handlers for events a radar never emits.

use std::fmt;

/// The eight channels a radar emits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    SectionDisplay,
    SectionClear,
    SectionOpen,
    SectionClose,
    EntryDisplay,
    EntryClear,
    EntryOpen,
    EntryClose,
}

impl Channel {
    pub const ALL: [Channel; 8] = [
        Channel::SectionDisplay,
        Channel::SectionClear,
        Channel::SectionOpen,
        Channel::SectionClose,
        Channel::EntryDisplay,
        Channel::EntryClear,
        Channel::EntryOpen,
        Channel::EntryClose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::SectionDisplay => "section:display",
            Channel::SectionClear => "section:clear",
            Channel::SectionOpen => "section:open",
            Channel::SectionClose => "section:close",
            Channel::EntryDisplay => "entry:display",
            Channel::EntryClear => "entry:clear",
            Channel::EntryOpen => "entry:open",
            Channel::EntryClose => "entry:close",
        }
    }

    /// Channel for a name like `"entry:open"`, `None` if unrecognized
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an emitted event
#[derive(Debug, Clone, PartialEq)]
pub enum RadarEvent {
    SectionDisplay {
        name: String,
        description: String,
        color: String,
    },
    SectionClear,
    SectionOpen {
        name: String,
        color: String,
    },
    SectionClose,
    EntryDisplay {
        name: String,
        description: String,
        analysis: String,
    },
    EntryClear,
    EntryOpen {
        name: String,
        description: String,
        analysis: String,
    },
    EntryClose,
}

impl RadarEvent {
    pub fn channel(&self) -> Channel {
        match self {
            RadarEvent::SectionDisplay { .. } => Channel::SectionDisplay,
            RadarEvent::SectionClear => Channel::SectionClear,
            RadarEvent::SectionOpen { .. } => Channel::SectionOpen,
            RadarEvent::SectionClose => Channel::SectionClose,
            RadarEvent::EntryDisplay { .. } => Channel::EntryDisplay,
            RadarEvent::EntryClear => Channel::EntryClear,
            RadarEvent::EntryOpen { .. } => Channel::EntryOpen,
            RadarEvent::EntryClose => Channel::EntryClose,
        }
    }

    /// Positional arguments, in the order listeners receive them
    pub fn args(&self) -> Vec<&str> {
        match self {
            RadarEvent::SectionDisplay {
                name,
                description,
                color,
            } => vec![name.as_str(), description.as_str(), color.as_str()],
            RadarEvent::SectionOpen { name, color } => vec![name.as_str(), color.as_str()],
            RadarEvent::EntryDisplay {
                name,
                description,
                analysis,
            }
            | RadarEvent::EntryOpen {
                name,
                description,
                analysis,
            } => vec![name.as_str(), description.as_str(), analysis.as_str()],
            RadarEvent::SectionClear
            | RadarEvent::SectionClose
            | RadarEvent::EntryClear
            | RadarEvent::EntryClose => Vec::new(),
        }
    }
}

/// Boxed listener
pub type Handler = Box<dyn FnMut(&RadarEvent)>;

/// Listeners per channel, in registration order
#[derive(Default)]
pub struct EventBus {
    handlers: [Vec<Handler>; 8],
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` on the channel called `name`.
    ///
    /// Returns whether the name was recognized; unknown names are a no-op.
    pub fn on(&mut self, name: &str, handler: impl FnMut(&RadarEvent) + 'static) -> bool {
        match Channel::parse(name) {
            Some(channel) => {
                self.subscribe(channel, handler);
                true
            }
            None => {
                log::debug!("Ignoring listener for unknown event {name:?}");
                false
            }
        }
    }

    pub fn subscribe(&mut self, channel: Channel, handler: impl FnMut(&RadarEvent) + 'static) {
        self.handlers[channel.slot()].push(Box::new(handler));
    }

    /// Call every listener of the event's channel, synchronously.
    ///
    /// A panicking listener unwinds through `emit`.
    pub fn emit(&mut self, event: &RadarEvent) {
        let channel = event.channel();
        log::debug!("emit {channel} {:?}", event.args());
        for handler in &mut self.handlers[channel.slot()] {
            handler(event);
        }
    }

    pub fn listener_count(&self, channel: Channel) -> usize {
        self.handlers[channel.slot()].len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for channel in Channel::ALL {
            map.entry(&channel.as_str(), &self.listener_count(channel));
        }
        map.finish()
    }
}
