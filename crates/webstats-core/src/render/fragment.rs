//! Repeated HTML blocks for the list sections of the page.

use std::borrow::Cow;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::Result;
use crate::snapshot::RoomInfo;
use crate::template::Template;

/// 1x1 transparent GIF used when a room has no icon.
pub const PLACEHOLDER_ICON: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

pub const ROOM_FRAGMENT: &str = r#"
        <div class="server">
          <div class="avatar">
            <img src="{icon_url}" alt='' />
          </div>
          <div class="title">
            {name} ({member_count})
          </div>
        </div>"#;

pub const EXTENSION_FRAGMENT: &str = r#"
        <div class="other-thing">
            {extension}
        </div>"#;

pub const COMMAND_FRAGMENT: &str = r#"
        <div class="other-thing">
            {command}
        </div>"#;

/// Parsed fragment templates for rooms, extensions and commands.
#[derive(Debug, Clone)]
pub struct FragmentTemplates {
    room: Template,
    extension: Template,
    command: Template,
}

impl FragmentTemplates {
    /// Parse custom fragment sources.
    pub fn new(room: &str, extension: &str, command: &str) -> Result<Self> {
        Ok(Self {
            room: Template::parse(room)?,
            extension: Template::parse(extension)?,
            command: Template::parse(command)?,
        })
    }

    /// The stock blocks.
    pub fn builtin() -> Result<Self> {
        Self::new(ROOM_FRAGMENT, EXTENSION_FRAGMENT, COMMAND_FRAGMENT)
    }

    pub fn rooms(&self, rooms: &[RoomInfo]) -> Result<String> {
        let mut out = String::new();
        for room in rooms {
            let member_count = room.member_count.to_string();
            self.room.render_into(&mut out, |field| match field {
                "icon_url" => Some(match room.icon_url.as_deref() {
                    Some(url) if !url.is_empty() => encode_double_quoted_attribute(url),
                    _ => Cow::Borrowed(PLACEHOLDER_ICON),
                }),
                "name" => Some(encode_text(&room.name)),
                "member_count" => Some(Cow::Borrowed(member_count.as_str())),
                _ => None,
            })?;
        }
        Ok(out)
    }

    pub fn extensions(&self, names: &[String]) -> Result<String> {
        render_names(&self.extension, "extension", names)
    }

    pub fn commands(&self, names: &[String]) -> Result<String> {
        render_names(&self.command, "command", names)
    }
}

fn render_names(tpl: &Template, field: &str, names: &[String]) -> Result<String> {
    let mut out = String::new();
    for name in names {
        tpl.render_into(&mut out, |f| (f == field).then(|| encode_text(name)))?;
    }
    Ok(out)
}
