use crate::{
    cache::KanjiCache,
    config::Config,
    lookup::{
        MeaningEngine,
        SourceResolver,
    },
};

/// Command string the viewer surface sends for a lookup gesture; everything
/// after the prefix is the selected text.
pub const LOOKUP_COMMAND_PREFIX: &str = "kanjiLookup:";

/// How long an overlay stays visible before the surface fades it out.
pub const OVERLAY_VISIBLE_SECS: u64 = 5;

/// A user-selected text span reported by the interactive surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub text: String,
}

/// Parses a surface message, accepting only the lookup command. The payload
/// may itself contain colons.
pub fn parse_command(command: &str) -> Option<LookupRequest> {
    command
        .strip_prefix(LOOKUP_COMMAND_PREFIX)
        .map(|text| LookupRequest { text: text.to_string() })
}

/// Styling passed through verbatim to the rendering surface. "auto" font
/// size defers to the text size the surface detects at the selection point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStyle {
    pub font_size: String,
    pub offset: String,
    pub visible_secs: u64,
}

impl OverlayStyle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            font_size: config.hover_font_size.clone(),
            offset: config.hover_offset.clone(),
            visible_secs: OVERLAY_VISIBLE_SECS,
        }
    }
}

/// Resolved overlay content for one lookup: the original selection, the
/// ordered non-empty pairs, the rendered summary, and the display styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub text: String,
    pub pairs: Vec<(char, String)>,
    pub html: String,
    pub style: OverlayStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    /// An overlay is visible; the surface dismisses it when the visible
    /// duration elapses, or a new trigger replaces it immediately.
    AwaitingDismiss,
}

/// Single-overlay lookup protocol. Requests are handled synchronously; a
/// trigger while an overlay is visible starts a fresh cycle rather than
/// queueing.
#[derive(Debug)]
pub struct HoverLookup {
    state: HoverState,
}

impl HoverLookup {
    pub fn new() -> Self {
        Self { state: HoverState::Idle }
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Resolves the selection and produces the overlay payload, replacing
    /// whatever overlay is currently displayed.
    pub fn trigger<R: SourceResolver>(
        &mut self,
        request: LookupRequest,
        config: &Config,
        cache: &mut KanjiCache,
        resolver: &R,
    ) -> LookupResponse {
        let pairs = MeaningEngine::new(cache, resolver).resolve(&request.text);
        let html = if pairs.is_empty() {
            format!("No kanji found in '{}'.", request.text)
        } else {
            pairs
                .iter()
                .map(|(kanji, meaning)| format!("{}: {}", kanji, meaning))
                .collect::<Vec<String>>()
                .join("<br>")
        };

        self.state = HoverState::AwaitingDismiss;
        LookupResponse {
            text: request.text,
            pairs,
            html,
            style: OverlayStyle::from_config(config),
        }
    }

    /// Surface callback when the visible duration elapses and the overlay
    /// has faded out.
    pub fn dismiss(&mut self) {
        self.state = HoverState::Idle;
    }

    /// Dispatch entry point for raw surface messages; non-lookup commands
    /// are ignored.
    pub fn handle_message<R: SourceResolver>(
        &mut self,
        command: &str,
        config: &Config,
        cache: &mut KanjiCache,
        resolver: &R,
    ) -> Option<LookupResponse> {
        parse_command(command).map(|request| self.trigger(request, config, cache, resolver))
    }
}

impl Default for HoverLookup {
    fn default() -> Self {
        Self::new()
    }
}
