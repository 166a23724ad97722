//! Dashboard page composition.
//!
//! The page template may reference any of [`PAGE_FIELDS`]; every one of them
//! is always supplied. A placeholder outside that set is rejected before any
//! output is produced.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::Result;
use crate::render::format::{format_cpu, format_mb, format_timestamp, format_uptime};
use crate::render::fragment::FragmentTemplates;
use crate::snapshot::StatsSnapshot;
use crate::template::Template;

macro_rules! page_fields {
    ($($variant:ident => $name:literal,)*) => {
        /// Named values a page template can reference.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PageField {
            $($variant,)*
        }

        /// Placeholder names accepted in the page template.
        pub const PAGE_FIELDS: &[&str] = &[$($name,)*];

        impl PageField {
            pub const ALL: &'static [PageField] = &[$(PageField::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(PageField::$variant => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(PageField::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

page_fields! {
    Rooms => "rooms",
    AvatarUrl => "avatar_url",
    Name => "name",
    Owner => "owner",
    Uptime => "uptime",
    TotalRooms => "total_rooms",
    UserCount => "user_count",
    ActiveExtensions => "active_extensions",
    TotalCommands => "total_commands",
    TotalChannels => "total_channels",
    TextChannels => "text_channels",
    VoiceChannels => "voice_channels",
    MessagesReceived => "messages_received",
    CommandsRun => "commands_run",
    CpuUsage => "cpu_usage",
    MemoryUsage => "memory_usage",
    MemoryUsageMb => "memory_usage_mb",
    Created => "created",
    DateNow => "date_now",
    LoadedExtensions => "loaded_extensions",
    AllCommands => "all_commands",
    Threads => "threads",
    IoReads => "io_reads",
    IoWrites => "io_writes",
}

/// Pre-rendered list sections of one page.
struct Fragments {
    rooms: String,
    extensions: String,
    commands: String,
}

fn field_value<'a>(
    field: PageField,
    snap: &'a StatsSnapshot,
    frags: &'a Fragments,
    now: DateTime<Utc>,
) -> Cow<'a, str> {
    let counts = &snap.counts;
    let process = &snap.process;
    match field {
        PageField::Rooms => Cow::Borrowed(frags.rooms.as_str()),
        PageField::LoadedExtensions => Cow::Borrowed(frags.extensions.as_str()),
        PageField::AllCommands => Cow::Borrowed(frags.commands.as_str()),
        PageField::AvatarUrl => encode_double_quoted_attribute(&snap.avatar_url),
        PageField::Name => encode_text(&snap.bot_name),
        PageField::Owner => encode_text(&snap.owner_name),
        PageField::Uptime => Cow::Owned(format_uptime(snap.uptime)),
        PageField::TotalRooms => Cow::Owned(counts.rooms.to_string()),
        PageField::UserCount => Cow::Owned(counts.users.to_string()),
        PageField::ActiveExtensions => Cow::Owned(counts.loaded_extensions.to_string()),
        PageField::TotalCommands => Cow::Owned(counts.total_commands.to_string()),
        PageField::TotalChannels => Cow::Owned(counts.total_channels().to_string()),
        PageField::TextChannels => Cow::Owned(counts.text_channels.to_string()),
        PageField::VoiceChannels => Cow::Owned(counts.voice_channels.to_string()),
        PageField::MessagesReceived => Cow::Owned(counts.messages_received.to_string()),
        PageField::CommandsRun => Cow::Owned(counts.commands_run.to_string()),
        PageField::CpuUsage => Cow::Owned(format_cpu(process.cpu_percent)),
        PageField::MemoryUsage => Cow::Owned(process.memory_bytes.to_string()),
        PageField::MemoryUsageMb => Cow::Owned(format_mb(process.memory_mb())),
        PageField::Created => Cow::Owned(format_timestamp(snap.created_at)),
        PageField::DateNow => Cow::Owned(format!("Page generated on {}", format_timestamp(now))),
        PageField::Threads => Cow::Owned(process.threads.to_string()),
        PageField::IoReads => Cow::Owned(process.io_read_bytes.to_string()),
        PageField::IoWrites => Cow::Owned(process.io_write_bytes.to_string()),
    }
}

/// Render the full page for one snapshot.
///
/// `now` feeds the `date_now` field; callers pass `Utc::now()`.
pub fn compose_page(
    page: &Template,
    fragments: &FragmentTemplates,
    snap: &StatsSnapshot,
    now: DateTime<Utc>,
) -> Result<String> {
    page.ensure_fields(PAGE_FIELDS)?;

    let frags = Fragments {
        rooms: fragments.rooms(&snap.rooms)?,
        extensions: fragments.extensions(&snap.extensions)?,
        commands: fragments.commands(&snap.commands)?,
    };

    page.render(|name| PageField::from_name(name).map(|f| field_value(f, snap, &frags, now)))
}
