use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;

use agent_chat_core::{MessageId, Role};
use agent_chat_engine::escape_html;
use thiserror::Error;

use super::{ContentKind, ElementId, MessageMarkup, UiCommand};
use crate::platform::snapshot::{write_atomically, SnapshotError};

/// Anchor id given to the row the list is scrolled to.
pub const LATEST_ANCHOR: &str = "latest";

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to write page snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("failed to write transcript: {0}")]
    Transcript(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ElementKind {
    Header { title: String },
    MessageList,
    TypingIndicator,
    ProgressBar,
    Input { placeholder: String },
    Button,
}

#[derive(Debug, Clone)]
struct Element {
    id: ElementId,
    kind: ElementKind,
    text: String,
    visible: bool,
    enabled: bool,
    height_px: Option<u32>,
    percent: Option<u8>,
    items: Vec<MessageMarkup>,
    scroll_target: Option<MessageId>,
}

impl Element {
    fn new(id: ElementId, kind: ElementKind, text: String) -> Self {
        Self {
            id,
            kind,
            text,
            visible: true,
            enabled: true,
            height_px: None,
            percent: None,
            items: Vec::new(),
            scroll_target: None,
        }
    }
}

/// Renders UI commands into a static HTML page and a plain-text transcript.
///
/// The page is rewritten on [`HtmlSurface::flush`]. The transcript receives
/// every message the first time it is scrolled into view, plus typing and
/// progress changes.
pub struct HtmlSurface<W: Write> {
    title: String,
    stylesheet: String,
    elements: Vec<Element>,
    snapshot_path: Option<PathBuf>,
    transcript: W,
    echoed: HashSet<MessageId>,
    page_dirty: bool,
}

impl<W: Write> HtmlSurface<W> {
    pub fn new(transcript: W, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            title: String::new(),
            stylesheet: String::new(),
            elements: Vec::new(),
            snapshot_path,
            transcript,
            echoed: HashSet::new(),
            page_dirty: false,
        }
    }

    pub fn apply(
        &mut self,
        commands: impl IntoIterator<Item = UiCommand>,
    ) -> Result<(), SurfaceError> {
        for command in commands {
            self.apply_one(command)?;
        }
        Ok(())
    }

    /// Writes the page snapshot if anything changed since the last flush.
    pub fn flush(&mut self) -> Result<(), SurfaceError> {
        self.transcript.flush()?;
        if !self.page_dirty {
            return Ok(());
        }
        if let Some(path) = &self.snapshot_path {
            write_atomically(path, &self.document())?;
        }
        self.page_dirty = false;
        Ok(())
    }

    #[cfg(test)]
    pub fn transcript(&self) -> &W {
        &self.transcript
    }

    fn apply_one(&mut self, command: UiCommand) -> Result<(), SurfaceError> {
        self.page_dirty = true;
        match command {
            UiCommand::CreatePage { title, stylesheet } => {
                self.title = title;
                self.stylesheet = stylesheet;
            }
            UiCommand::CreateHeader { element, title } => {
                self.create(element, ElementKind::Header { title }, String::new());
            }
            UiCommand::CreateMessageList { element } => {
                self.create(element, ElementKind::MessageList, String::new());
            }
            UiCommand::CreateTypingIndicator { element, text } => {
                self.create(element, ElementKind::TypingIndicator, text);
                if let Some(indicator) = self.element_mut(element) {
                    indicator.visible = false;
                }
            }
            UiCommand::CreateProgressBar { element } => {
                self.create(element, ElementKind::ProgressBar, String::new());
            }
            UiCommand::CreateInput {
                element,
                placeholder,
            } => {
                self.create(element, ElementKind::Input { placeholder }, String::new());
            }
            UiCommand::CreateButton { element, text } => {
                self.create(element, ElementKind::Button, text);
            }
            UiCommand::ReplaceMessages { element, items } => {
                if let Some(list) = self.element_mut(element) {
                    list.items = items;
                }
            }
            UiCommand::SetVisible { element, visible } => {
                let Some(target) = self.element_mut(element) else {
                    return Ok(());
                };
                let appeared = visible && !target.visible;
                target.visible = visible;
                if appeared && target.kind == ElementKind::TypingIndicator {
                    let line = format!("… {}", target.text);
                    writeln!(self.transcript, "{line}")?;
                }
            }
            UiCommand::SetProgress { element, percent } => {
                let Some(bar) = self.element_mut(element) else {
                    return Ok(());
                };
                let changed = bar.percent != percent;
                bar.percent = percent;
                if let (true, Some(percent)) = (changed, percent) {
                    writeln!(self.transcript, "[progress {percent}%]")?;
                }
            }
            UiCommand::SetText { element, text } => {
                if let Some(target) = self.element_mut(element) {
                    target.text = text;
                }
            }
            UiCommand::SetHeight { element, px } => {
                if let Some(target) = self.element_mut(element) {
                    target.height_px = Some(px);
                }
            }
            UiCommand::SetEnabled { element, enabled } => {
                if let Some(target) = self.element_mut(element) {
                    target.enabled = enabled;
                }
            }
            UiCommand::ScrollToLatest { element } => self.scroll_to_latest(element)?,
        }
        Ok(())
    }

    fn create(&mut self, id: ElementId, kind: ElementKind, text: String) {
        self.elements.retain(|element| element.id != id);
        self.elements.push(Element::new(id, kind, text));
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.id == id)
    }

    fn scroll_to_latest(&mut self, id: ElementId) -> Result<(), SurfaceError> {
        let Some(list) = self.elements.iter_mut().find(|element| element.id == id) else {
            return Ok(());
        };
        list.scroll_target = list.items.last().map(|item| item.id);
        for item in &list.items {
            if self.echoed.insert(item.id) {
                writeln!(self.transcript, "{}> {}", speaker(item.role), item.text)?;
            }
        }
        Ok(())
    }

    /// The complete page for the current element state.
    pub fn document(&self) -> String {
        let mut body = String::new();
        let mut composer = String::new();
        for element in &self.elements {
            match element.kind {
                ElementKind::Input { .. } | ElementKind::Button => {
                    write_element(element, &mut composer)
                }
                _ => write_element(element, &mut body),
            }
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>\n{style}</style>\n</head>\n<body>\n\
             <main class=\"chat\">\n{body}<div class=\"composer\">\n{composer}</div>\n\
             </main>\n</body>\n</html>\n",
            title = escape_html(&self.title),
            style = self.stylesheet,
        )
    }
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "agents",
    }
}

fn hidden_attr(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " hidden"
    }
}

fn write_element(element: &Element, out: &mut String) {
    let id = element.id.as_str();
    let hidden = hidden_attr(element.visible);
    let _ = match &element.kind {
        ElementKind::Header { title } => writeln!(
            out,
            "<header id=\"{id}\" class=\"header\"{hidden}><span class=\"brand\">{}</span><span class=\"session\">{}</span></header>",
            escape_html(title),
            escape_html(&element.text)
        ),
        ElementKind::MessageList => write_message_list(element, out),
        ElementKind::TypingIndicator => writeln!(
            out,
            "<div id=\"{id}\" class=\"typing\"{hidden}>{}</div>",
            escape_html(&element.text)
        ),
        ElementKind::ProgressBar => match element.percent {
            Some(percent) => writeln!(
                out,
                "<progress id=\"{id}\" class=\"progress\" max=\"100\" value=\"{percent}\"{hidden}>{percent}%</progress>"
            ),
            None => writeln!(
                out,
                "<progress id=\"{id}\" class=\"progress\" max=\"100\" hidden></progress>"
            ),
        },
        ElementKind::Input { placeholder } => {
            let style = element
                .height_px
                .map(|px| format!(" style=\"height: {px}px\""))
                .unwrap_or_default();
            writeln!(
                out,
                "<textarea id=\"{id}\" placeholder=\"{}\"{style}{hidden}>{}</textarea>",
                escape_html(placeholder),
                escape_html(&element.text)
            )
        }
        ElementKind::Button => {
            let disabled = if element.enabled { "" } else { " disabled" };
            writeln!(
                out,
                "<button id=\"{id}\" type=\"button\"{disabled}{hidden}>{}</button>",
                escape_html(&element.text)
            )
        }
    };
}

fn write_message_list(list: &Element, out: &mut String) -> std::fmt::Result {
    let id = list.id.as_str();
    match list.scroll_target {
        Some(target) => writeln!(
            out,
            "<div id=\"{id}\" class=\"message-list\" data-scroll-target=\"msg-{target}\">"
        )?,
        None => writeln!(out, "<div id=\"{id}\" class=\"message-list\">")?,
    }
    for item in &list.items {
        let role = match item.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        let anchor = if list.scroll_target == Some(item.id) {
            format!(" id=\"{LATEST_ANCHOR}\"")
        } else {
            String::new()
        };
        let extra = match item.kind {
            ContentKind::PlainText => "",
            ContentKind::Html => " bubble-html",
            ContentKind::Table => " bubble-html bubble-table",
        };
        writeln!(
            out,
            "<div class=\"row row-{role}\"{anchor}><div id=\"msg-{}\" class=\"bubble bubble-{role}{extra}\">{}</div></div>",
            item.id, item.html
        )?;
    }
    writeln!(out, "</div>")
}
