/// The single element a pointer click landed on
///
/// Hit testing resolves the innermost element, so a click on a card's
/// download button is `CardDownload`, never `Card`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Card body for item `_idx`
    Card(usize),
    /// Download button inside the card for item `_idx`
    CardDownload(usize),
    SearchBox,
    FilterSelector,
    SortToggle,
    ViewerClose,
    /// Overlay backdrop outside the viewer content
    ViewerBackground,
    /// Anywhere inside the viewer content that is not a control
    ViewerContent,
    ViewerDownload,
    None,
}

/// What a click asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    OpenViewer(usize),
    Download(usize),
    CloseViewer,
    FocusSearch,
    CycleFilter,
    ToggleSort,
    Nothing,
}

/// Resolves a click given the item currently open in the viewer
pub fn dispatch_click(target: ClickTarget, open_viewer: Option<usize>) -> ClickOutcome {
    if let Some(idx) = open_viewer {
        return match target {
            ClickTarget::ViewerClose | ClickTarget::ViewerBackground => ClickOutcome::CloseViewer,
            ClickTarget::ViewerDownload => ClickOutcome::Download(idx),
            _ => ClickOutcome::Nothing,
        };
    }

    match target {
        ClickTarget::Card(idx) => ClickOutcome::OpenViewer(idx),
        ClickTarget::CardDownload(idx) => ClickOutcome::Download(idx),
        ClickTarget::SearchBox => ClickOutcome::FocusSearch,
        ClickTarget::FilterSelector => ClickOutcome::CycleFilter,
        ClickTarget::SortToggle => ClickOutcome::ToggleSort,
        _ => ClickOutcome::Nothing,
    }
}
