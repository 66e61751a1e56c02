use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::chart::{CellClass, ChartCell};
use crate::profile::{Matchup, OffenseCoverage, PokemonTypeProfile, TypeCard};
use crate::state::{AppState, View};
use crate::types::{format_multiplier, Multiplier, TypeName};

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const CELL_SUPER: Color = Color::Rgb(88, 176, 96);
const CELL_RESIST: Color = Color::Rgb(196, 84, 72);
const CELL_IMMUNE: Color = Color::Rgb(40, 40, 48);

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TypedexComponentId {
    Header,
    Chart,
    Cards,
    Profile,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedexContext {
    Header,
    Chart,
    Cards,
    Profile,
}

impl EventRoutingState<TypedexComponentId, TypedexContext> for AppState {
    fn focused(&self) -> Option<TypedexComponentId> {
        match self.view {
            View::Chart => Some(TypedexComponentId::Chart),
            View::Cards => Some(TypedexComponentId::Cards),
            View::Profile => Some(TypedexComponentId::Profile),
        }
    }

    fn modal(&self) -> Option<TypedexComponentId> {
        None
    }

    fn binding_context(&self, id: TypedexComponentId) -> TypedexContext {
        match id {
            TypedexComponentId::Header => TypedexContext::Header,
            TypedexComponentId::Chart => TypedexContext::Chart,
            TypedexComponentId::Cards => TypedexContext::Cards,
            TypedexComponentId::Profile => TypedexContext::Profile,
        }
    }

    fn default_context(&self) -> TypedexContext {
        TypedexContext::Chart
    }
}

pub struct TypedexUi {
    card_list: SelectList,
    status_bar: StatusBar,
}

impl Default for TypedexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl TypedexUi {
    pub fn new() -> Self {
        Self {
            card_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<TypedexComponentId>,
    ) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        event_ctx.set_component_area(TypedexComponentId::Header, layout[0]);
        render_header(frame, layout[0], state);
        match state.view {
            View::Chart => {
                event_ctx.set_component_area(TypedexComponentId::Chart, layout[1]);
                render_chart_view(frame, layout[1], state);
            }
            View::Cards => {
                event_ctx.set_component_area(TypedexComponentId::Cards, layout[1]);
                render_cards_view(frame, layout[1], state, &mut self.card_list);
            }
            View::Profile => {
                event_ctx.set_component_area(TypedexComponentId::Profile, layout[1]);
                render_profile_view(frame, layout[1], state);
            }
        }
        render_footer(frame, layout[2], state, &mut self.status_bar);
    }

    pub fn handle_chart_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_chart_event(event, state)
    }

    pub fn handle_cards_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_cards_event(event, state, &mut self.card_list)
    }

    pub fn handle_profile_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_profile_event(event, state)
    }
}

pub fn handle_chart_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Up | crossterm::event::KeyCode::Char('k') => {
                vec![Action::CursorMove(-1)]
            }
            crossterm::event::KeyCode::Down | crossterm::event::KeyCode::Char('j') => {
                vec![Action::CursorMove(1)]
            }
            crossterm::event::KeyCode::Home => vec![Action::CursorSet(0)],
            crossterm::event::KeyCode::End => vec![Action::CursorSet(usize::MAX)],
            _ => vec![],
        },
        EventKind::Scroll { delta, .. } => vec![Action::CursorMove(*delta as i16)],
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_cards_event(
    event: &EventKind,
    state: &AppState,
    card_list: &mut SelectList,
) -> HandlerResponse<Action> {
    let items = card_items(&state.cards());
    if items.is_empty() {
        return HandlerResponse::ignored();
    }
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.cursor.min(items.len().saturating_sub(1)),
        is_focused: true,
        style: card_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::CursorSet,
        render_item: &|item| item.clone(),
    };
    let actions: Vec<_> = card_list.handle_event(event, props).into_iter().collect();
    handler_response(actions)
}

pub fn handle_profile_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char(']') | crossterm::event::KeyCode::Right => {
                vec![Action::PrimaryTypeNext]
            }
            crossterm::event::KeyCode::Char('[') | crossterm::event::KeyCode::Left => {
                vec![Action::PrimaryTypePrev]
            }
            crossterm::event::KeyCode::Char('}') | crossterm::event::KeyCode::Down => {
                vec![Action::SecondaryTypeNext]
            }
            crossterm::event::KeyCode::Char('{') | crossterm::event::KeyCode::Up => {
                vec![Action::SecondaryTypePrev]
            }
            crossterm::event::KeyCode::Char('c') => vec![Action::SecondaryTypeClear],
            crossterm::event::KeyCode::Char('u') => vec![Action::AggregationToggle],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM))
        .title("TYPEDEX");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let tabs = Tabs::new(View::ALL.iter().map(|view| view.title()).collect::<Vec<_>>())
        .select(state.view.index())
        .style(Style::default().fg(TEXT_DIM))
        .highlight_style(
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, layout[0]);

    let source = match &state.catalog {
        Some(catalog) => catalog.origin().label(),
        None => "none",
    };
    let summary = Line::from(vec![
        Span::raw("Source: "),
        Span::styled(source, Style::default().fg(ACCENT_GOLD)),
        Span::raw("  |  Selection: "),
        Span::styled(selection_label(state), Style::default().fg(ACCENT_TEAL)),
        Span::raw("  |  Mode: "),
        Span::styled(state.aggregation.label(), Style::default().fg(ACCENT_GOLD)),
    ]);
    frame.render_widget(Paragraph::new(summary), layout[1]);
}

/// Shown in place of a view while there is no matrix to draw from.
fn placeholder(state: &AppState) -> Option<Paragraph<'static>> {
    if state.matrix.is_some() {
        return None;
    }
    let text = if state.loading {
        Text::from("Loading type data...")
    } else if let Some(error) = &state.load_error {
        Text::from(vec![
            Line::from(Span::styled(
                "Type data unavailable",
                Style::default().fg(CELL_RESIST).add_modifier(Modifier::BOLD),
            )),
            Line::from(error.clone()),
            Line::from(" "),
            Line::from("Press r to retry."),
        ])
    } else {
        Text::from("No type data.")
    };
    Some(
        Paragraph::new(text)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: true }),
    )
}

pub fn render_chart_view(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("ATTACK \u{2192} DEFENSE")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_TEAL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(placeholder) = placeholder(state) {
        frame.render_widget(placeholder, inner);
        return;
    }
    let Some(chart) = state.chart() else {
        return;
    };

    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(chart.columns.iter().map(|ty| {
        Cell::from(ty.short_name()).style(Style::default().fg(type_color(*ty)))
    }));
    let header = Row::new(header_cells).style(Style::default().add_modifier(Modifier::BOLD));

    let rows = chart.rows.iter().enumerate().map(|(index, row)| {
        let mut cells = vec![Cell::from(row.attacking.name())
            .style(Style::default().fg(type_color(row.attacking)))];
        cells.extend(row.cells.iter().map(chart_cell));
        let style = if index == state.cursor {
            Style::default().bg(BG_HIGHLIGHT)
        } else {
            Style::default()
        };
        Row::new(cells).style(style)
    });

    let mut widths = vec![Constraint::Length(9)];
    widths.extend(chart.columns.iter().map(|_| Constraint::Length(4)));
    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(table, inner);
}

fn chart_cell(cell: &ChartCell) -> Cell<'static> {
    let style = match cell.class {
        CellClass::Neutral => Style::default().fg(TEXT_DIM),
        CellClass::SuperEffective => Style::default()
            .fg(TEXT_MAIN)
            .bg(CELL_SUPER)
            .add_modifier(Modifier::BOLD),
        CellClass::Resisted => Style::default().fg(TEXT_MAIN).bg(CELL_RESIST),
        CellClass::Immune => Style::default().fg(TEXT_DIM).bg(CELL_IMMUNE),
        CellClass::Unknown => Style::default().fg(ACCENT_GOLD),
    };
    Cell::from(cell.label()).style(style)
}

pub fn render_cards_view(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    card_list: &mut SelectList,
) {
    if let Some(placeholder) = placeholder(state) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("TYPES")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(placeholder, inner);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(area);
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title("TYPES")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_TEAL));
    let list_inner = list_block.inner(layout[0]);
    frame.render_widget(list_block, layout[0]);

    let cards = state.cards();
    let items = card_items(&cards);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.cursor.min(items.len().saturating_sub(1)),
        is_focused: true,
        style: card_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::CursorSet,
        render_item: &|item| item.clone(),
    };
    card_list.render(frame, list_inner, props);

    let selected = cards.get(state.cursor.min(cards.len().saturating_sub(1)));
    let title = selected
        .map(|card| card.ty.name().to_ascii_uppercase())
        .unwrap_or_default();
    let detail_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN));
    let detail_inner = detail_block.inner(layout[1]);
    frame.render_widget(detail_block, layout[1]);
    let text = selected.map(card_text).unwrap_or_else(|| Text::from("No card."));
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: true }),
        detail_inner,
    );
}

fn card_items(cards: &[TypeCard]) -> Vec<Line<'static>> {
    cards
        .iter()
        .map(|card| {
            Line::from(vec![
                Span::styled("\u{25a0} ", Style::default().fg(type_color(card.ty))),
                Span::raw(card.ty.name()),
            ])
        })
        .collect()
}

fn card_text(card: &TypeCard) -> Text<'static> {
    let mut lines = Vec::new();
    let (r, g, b) = card.ty.color();
    lines.push(Line::from(vec![
        Span::styled("      ", Style::default().bg(type_color(card.ty))),
        Span::styled(
            format!("  #{r:02X}{g:02X}{b:02X}"),
            Style::default().fg(TEXT_DIM),
        ),
    ]));
    lines.push(Line::from(" "));
    for (label, types) in [
        ("Weak to", &card.weak_to),
        ("Resists", &card.resists),
        ("Immune to", &card.immune_to),
    ] {
        lines.push(section_title(label));
        lines.push(type_list_line(types));
        lines.push(Line::from(" "));
    }
    if card.incomplete {
        lines.push(Line::from(Span::styled(
            "Some attacking types are missing from the catalog.",
            Style::default().fg(ACCENT_GOLD),
        )));
    }
    Text::from(lines)
}

pub fn render_profile_view(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(placeholder) = placeholder(state) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("PROFILE")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(placeholder, inner);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let defense_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("DEFENSE: {}", selection_label(state)))
        .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN));
    let offense_block = Block::default()
        .borders(Borders::ALL)
        .title("OFFENSE")
        .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN));
    let defense_inner = defense_block.inner(layout[0]);
    let offense_inner = offense_block.inner(layout[1]);
    frame.render_widget(defense_block, layout[0]);
    frame.render_widget(offense_block, layout[1]);

    let defense = match state.profile() {
        Some(Ok(profile)) => defense_text(&profile),
        Some(Err(error)) => Text::from(error.to_string()),
        None => Text::from("No type data."),
    };
    let offense = match state.coverage() {
        Some(Ok(coverage)) => offense_text(&coverage),
        Some(Err(error)) => Text::from(error.to_string()),
        None => Text::from("No type data."),
    };
    frame.render_widget(
        Paragraph::new(defense)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: true }),
        defense_inner,
    );
    frame.render_widget(
        Paragraph::new(offense)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: true }),
        offense_inner,
    );
}

fn defense_text(profile: &PokemonTypeProfile) -> Text<'static> {
    let mut lines = Vec::new();
    matchup_sections(&mut lines, "Weak", &profile.weaknesses);
    matchup_sections(&mut lines, "Resist", &profile.resistances);
    matchup_sections(&mut lines, "Immune", &profile.immunities);
    if !profile.unresolved.is_empty() {
        lines.push(Line::from(Span::styled(
            "Unresolved",
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        )));
        lines.push(type_list_line(&profile.unresolved));
    }
    if lines.is_empty() {
        return Text::from("No weaknesses, resistances or immunities.");
    }
    Text::from(lines)
}

/// One heading per distinct multiplier, strongest first.
fn matchup_sections(lines: &mut Vec<Line<'static>>, prefix: &str, matchups: &[Matchup]) {
    let mut multipliers: Vec<f32> = Vec::new();
    for matchup in matchups {
        if !multipliers.contains(&matchup.multiplier) {
            multipliers.push(matchup.multiplier);
        }
    }
    multipliers.sort_by(|a, b| b.total_cmp(a));
    for multiplier in multipliers {
        let types: Vec<TypeName> = matchups
            .iter()
            .filter(|matchup| matchup.multiplier == multiplier)
            .map(|matchup| matchup.attacking)
            .collect();
        let label = if multiplier == 0.0 {
            prefix.to_string()
        } else {
            format!("{prefix} {}", format_multiplier(multiplier))
        };
        lines.push(section_title(&label));
        lines.push(type_list_line(&types));
        lines.push(Line::from(" "));
    }
}

fn offense_text(coverage: &OffenseCoverage) -> Text<'static> {
    let mut lines = Vec::new();
    for (multiplier, label) in [
        (Multiplier::Double, "Strong 2x"),
        (Multiplier::Half, "Weak 0.5x"),
        (Multiplier::Immune, "No effect"),
    ] {
        let types = coverage.with(multiplier);
        if types.is_empty() {
            continue;
        }
        lines.push(section_title(label));
        lines.push(type_list_line(&types));
        lines.push(Line::from(" "));
    }
    if lines.is_empty() {
        return Text::from("Neutral against every type.");
    }
    Text::from(lines)
}

fn section_title(label: &str) -> Line<'static> {
    Line::from(Span::styled(
        label.to_string(),
        Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
    ))
}

fn type_list_line(types: &[TypeName]) -> Line<'static> {
    if types.is_empty() {
        return Line::from(Span::styled("-", Style::default().fg(TEXT_DIM)));
    }
    let mut spans = Vec::with_capacity(types.len() * 2);
    for (index, ty) in types.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(", "));
        }
        spans.push(Span::styled(ty.name(), Style::default().fg(type_color(*ty))));
    }
    Line::from(spans)
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.status_line();
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    let left = match state.view {
        View::Chart | View::Cards => vec![StatusBarHint::new("j/k", "Move")],
        View::Profile => vec![
            StatusBarHint::new("[ ]", "Type 1"),
            StatusBarHint::new("{ }", "Type 2"),
            StatusBarHint::new("c", "Clear"),
            StatusBarHint::new("u", "Mode"),
        ],
    };
    let center = vec![
        StatusBarHint::new("Tab", "View"),
        StatusBarHint::new("r", "Retry"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}

fn card_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn selection_label(state: &AppState) -> String {
    state
        .selected_types()
        .iter()
        .map(|ty| ty.name())
        .collect::<Vec<_>>()
        .join(" / ")
}

fn type_color(ty: TypeName) -> Color {
    let (r, g, b) = ty.color();
    Color::Rgb(r, g, b)
}
