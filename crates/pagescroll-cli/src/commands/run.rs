use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use pagescroll_core::{AppConfig, DemoSource, PageSource};
use pagescroll_tui::{
    app::{App, PageRequest},
    event::{AppEvent, EventHandler, PageLoadResult},
    input::handle_key_event,
    widgets::{ItemListWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let source: Arc<dyn PageSource> = Arc::new(DemoSource::new(config.source.clone()));
    info!(
        source = source.name(),
        total_pages = source.total_pages(),
        items_per_page = source.items_per_page(),
        "Starting pagescroll"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("pagescroll"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, config, source);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    config: Arc<AppConfig>,
    source: Arc<dyn PageSource>,
) -> Result<()> {
    let mut app = App::new(config.clone(), source.total_pages(), source.items_per_page());
    let event_handler = EventHandler::new(config.ui.tick_rate_ms);

    // Create channel for async page fetch results
    let (page_tx, mut page_rx) = mpsc::unbounded_channel::<PageLoadResult>();

    // Size the viewport before the first page arrives
    let size = terminal.size()?;
    app.set_viewport_rows(size.height.saturating_sub(3) as u32);
    spawn_requests(app.start(Instant::now()), &source, &page_tx);

    let scroll_lines = i64::from(config.ui.scroll_lines.max(1));

    // Main loop
    loop {
        // Process any completed fetches (non-blocking)
        while let Ok(result) = page_rx.try_recv() {
            let requests = app.page_loaded(result, Instant::now());
            spawn_requests(requests, &source, &page_tx);
        }

        spawn_requests(app.tick(Instant::now()), &source, &page_tx);

        // Draw UI
        terminal.draw(|frame| {
            let [list_area, status_area] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

            app.set_viewport_rows(ItemListWidget::inner_rows(list_area));
            ItemListWidget::render(frame, list_area, &app);
            StatusBarWidget::render(frame, status_area, &app);
        })?;

        if let Some(event) = event_handler.next()? {
            let now = Instant::now();
            let requests = match event {
                AppEvent::Key(key) => app.handle_action(handle_key_event(key), now),
                AppEvent::WheelDown => app.scroll_lines(scroll_lines, now),
                AppEvent::WheelUp => app.scroll_lines(-scroll_lines, now),
                // Viewport is re-measured on the next draw
                AppEvent::Resize(_, _) | AppEvent::Tick => Vec::new(),
            };
            spawn_requests(requests, &source, &page_tx);
        }

        if app.should_quit {
            break;
        }
    }

    info!("Exiting pagescroll");
    Ok(())
}

fn spawn_requests(
    requests: Vec<PageRequest>,
    source: &Arc<dyn PageSource>,
    tx: &mpsc::UnboundedSender<PageLoadResult>,
) {
    for request in requests {
        spawn_page_load(request, source.clone(), tx.clone());
    }
}

/// Spawn an async task to fetch one page
fn spawn_page_load(
    request: PageRequest,
    source: Arc<dyn PageSource>,
    tx: mpsc::UnboundedSender<PageLoadResult>,
) {
    tokio::spawn(async move {
        let PageRequest { page, ticket } = request;
        let result = match source.fetch_page(page).await {
            Ok(items) => PageLoadResult::Success {
                page,
                items,
                ticket,
            },
            Err(error) => PageLoadResult::Failure {
                page,
                error,
                ticket,
            },
        };
        let _ = tx.send(result);
    });
}
