mod deploy;
mod monitor;
mod provider;
mod sign_up;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::steps::{StepId, StepResult};
use super::WizardApp;
use crate::ui::center_rect;
use crate::vim::VimMode;

/// Main draw function for the wizard
pub fn draw(frame: &mut Frame, app: &WizardApp) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    // 1-line header, content, 3-line message, 1-line status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, chunks[0], app);
    if app.sequencer.is_complete() {
        monitor::draw_monitor(frame, chunks[1], app);
    } else {
        draw_steps(frame, chunks[1], app);
    }
    draw_message(frame, chunks[2], app);
    draw_status_bar(frame, chunks[3], app);

    if app.confirm_quit {
        draw_confirm_quit(frame, app);
    }

    if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let title = format!(" {} (v{}) ", app.config.general.title, env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let context = match (&app.cluster_context, app.is_dryrun()) {
        (Some(ctx), true) => format!("[dryrun] [Context: {ctx}] "),
        (Some(ctx), false) => format!("[Context: {ctx}] "),
        (None, true) => "[dryrun] ".to_string(),
        (None, false) => String::new(),
    };
    frame.render_widget(
        Paragraph::new(context)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_steps(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);

    draw_sidebar(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Steps ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (idx, step) in app.sequencer.steps().iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }

        let result = app.step_result(idx);
        let status = match result {
            StepResult::Completed => "[x]",
            StepResult::Skipped => "[-]",
            StepResult::Failed => "[!]",
            StepResult::Pending => "[ ]",
        };
        let required = if step.optional { "" } else { " *" };
        let line_text = format!(" {status} {}{required}", step.id.short_name());

        let style = if idx == app.sequencer.active_index() {
            app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            match result {
                StepResult::Completed => app.theme.secondary_style(),
                StepResult::Failed => app.theme.error_style(),
                StepResult::Skipped => app.theme.muted_style(),
                StepResult::Pending => app.theme.style(),
            }
        };

        frame.render_widget(
            Paragraph::new(line_text).style(style),
            Rect::new(inner.x, inner.y + idx as u16, inner.width, 1),
        );
    }

    if inner.height > app.sequencer.len() as u16 + 2 {
        frame.render_widget(
            Paragraph::new("* required").style(app.theme.muted_style()),
            Rect::new(inner.x + 1, inner.y + inner.height - 1, inner.width.saturating_sub(1), 1),
        );
    }
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 4 {
        return;
    }

    let content = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
    match app.current_step_id() {
        Some(StepId::SelectProvider) => provider::draw_provider_step(frame, content, app),
        Some(StepId::SignUp) => sign_up::draw_sign_up_step(frame, content, app),
        Some(StepId::Deploy) => deploy::draw_deploy_step(frame, content, app),
        None => {}
    }

    draw_navigation(frame, Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1), app);
}

/// Back / Skip / Next bar at the foot of the step panel
fn draw_navigation(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let enabled = |on: bool| {
        if on {
            app.theme.primary_style().add_modifier(Modifier::BOLD)
        } else {
            app.theme.muted_style()
        }
    };
    let optional = app.sequencer.active_step().is_some_and(|s| s.optional);

    let left = Line::from(Span::styled(" < Back (h)", enabled(app.sequencer.back_available())));
    frame.render_widget(Paragraph::new(left), area);

    let mut right = Vec::new();
    if optional {
        right.push(Span::styled(":skip  ", app.theme.muted_style()));
    }
    right.push(Span::styled("Next (l) > ", enabled(app.sequencer.next_available())));
    frame.render_widget(
        Paragraph::new(Line::from(right)).alignment(Alignment::Right),
        area,
    );
}

fn draw_message(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let (text, title, border_style, text_style) = match &app.message {
        Some(m) if m.is_error => (
            m.text.as_str(),
            " Error ",
            app.theme.error_style(),
            app.theme.error_style(),
        ),
        Some(m) => (m.text.as_str(), " Info ", app.theme.secondary_style(), app.theme.style()),
        None if app.is_executing => (
            "Deploying Kubescape...",
            " Info ",
            app.theme.secondary_style(),
            app.theme.style(),
        ),
        None => return,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    frame.render_widget(
        Paragraph::new(Span::styled(text, text_style))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let mode_name = app.vim_mode.display_name();
    let mode_span = Span::styled(format!(" {mode_name} "), app.theme.mode_style(mode_name));

    let after_mode = if app.vim_mode == VimMode::Command {
        Span::styled(format!(":{}", app.command_buffer.content()), app.theme.style())
    } else {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![mode_span, Span::raw(" "), after_mode])),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let position = format!(
        "{}/{}",
        app.sequencer.active_index().min(app.sequencer.len()),
        app.sequencer.len()
    );
    let right_text = if app.status_bar.right_hint.is_empty() {
        position
    } else {
        format!("{position}  {}", app.status_bar.right_hint)
    };

    frame.render_widget(
        Paragraph::new(right_text)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width - area.width / 3, 1),
    );
}

fn draw_confirm_quit(frame: &mut Frame, app: &WizardApp) {
    let area = center_rect(frame.area(), 44, 7);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style())
        .title(" Quit ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let question = if app.sequencer.is_complete() {
        "Close the Kubescape wizard?"
    } else {
        "Quit before Kubescape is deployed?"
    };
    frame.render_widget(
        Paragraph::new(question)
            .style(app.theme.style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let hints = Line::from(vec![
        Span::styled("[", app.theme.style()),
        Span::styled("Y", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]es / [", app.theme.style()),
        Span::styled("N", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]o", app.theme.style()),
    ]);
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 3, inner.width, 1),
    );
}

fn draw_help(frame: &mut Frame, app: &WizardApp) {
    let help_text = [
        "",
        "Navigation:",
        "",
        "  l / Right      Next step",
        "  h / Left       Previous step",
        "  j/k, Tab       Move within a step",
        "  Enter          Select / Deploy / Open link",
        "",
        "Editing:",
        "",
        "  i              Edit field",
        "  Esc            Back to normal mode",
        "  Ctrl+u         Clear field",
        "",
        "Commands: :next :back :skip :deploy :open :reset :quit",
        "",
        "Press q or Esc to close",
    ];

    let width = 60.min(frame.area().width.saturating_sub(4));
    let height = (help_text.len() as u16 + 2).min(frame.area().height.saturating_sub(2));
    let area = center_rect(frame.area(), width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, line) in help_text.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}
