use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::content::{ContentError, ContentProvider, StepContent};
use crate::storage::{FormStorage, MemoryStorage};
use crate::ui::{ScreenAction, TerminalGuard, WizardScreen};
use crate::wizard::{JumpTarget, LoadTicket, Transition, WizardError, WizardSession};

type LoadResult = (LoadTicket, Result<StepContent, ContentError>);

pub struct App {
    config: Config,
    session: WizardSession,
    provider: Arc<dyn ContentProvider>,
    screen: WizardScreen,
    loads_tx: mpsc::UnboundedSender<LoadResult>,
    loads_rx: mpsc::UnboundedReceiver<LoadResult>,
    should_quit: bool,
}

impl App {
    /// Build the app from configuration. `ephemeral` keeps form data in
    /// memory only.
    pub fn new(config: Config, ephemeral: bool) -> Result<Self> {
        let catalog = Arc::new(config.load_catalog()?);
        let provider = config.content_provider()?;
        let storage: Arc<dyn FormStorage> = if ephemeral {
            Arc::new(MemoryStorage::new())
        } else {
            Arc::new(config.file_storage())
        };

        tracing::info!(
            provider = provider.name(),
            steps = catalog.total_steps(),
            sub_steps = catalog.total_sub_steps(),
            ephemeral,
            "Starting wizard"
        );

        let session =
            WizardSession::new(catalog, storage).with_storage_key(config.storage.key.clone());
        Ok(Self::with_parts(config, session, provider))
    }

    pub fn with_parts(
        config: Config,
        session: WizardSession,
        provider: Arc<dyn ContentProvider>,
    ) -> Self {
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        Self {
            config,
            session,
            provider,
            screen: WizardScreen::new(),
            loads_tx,
            loads_rx,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn screen(&self) -> &WizardScreen {
        &self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        let guard = TerminalGuard::new()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        self.start();

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            self.apply_loads().await;
            self.screen.sync(&self.session);

            terminal.draw(|f| self.screen.render(f, &self.session))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key).await;
                    }
                }
            }
        }

        guard.restore()?;
        Ok(())
    }

    /// Kick off the load of the first sub-step
    pub fn start(&mut self) {
        if let Some(ticket) = self.session.begin_load() {
            self.spawn_load(ticket);
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        let action = self.screen.handle_key(key, &self.session);
        self.apply_action(action).await;
    }

    pub async fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::FieldChanged { name, value } => {
                if self.session.set_field(&name, value) {
                    self.screen.publish_status(self.session.live_fields());
                    if let Err(e) = self.session.drain_reports().await {
                        self.report_error("Could not save form data", &e);
                    }
                }
            }
            ScreenAction::Continue => {
                let result = self.session.advance().await;
                self.handle_transition(result);
            }
            ScreenAction::Back => {
                let result = self.session.retreat().await;
                self.handle_transition(result);
            }
            ScreenAction::Skip => {
                let result = self.session.skip().await;
                self.handle_transition(result);
            }
            ScreenAction::Jump(target) => {
                let result = match target {
                    JumpTarget::Step(step) => self.session.go_to_step(step).await,
                    JumpTarget::SubStep(step, sub_step) => {
                        self.session.go_to_sub_step(step, sub_step).await
                    }
                };
                self.handle_transition(result);
            }
            ScreenAction::Retry => {
                if let Some(ticket) = self.session.retry_load() {
                    self.screen.clear_status();
                    self.spawn_load(ticket);
                }
            }
            ScreenAction::Reset => match self.session.reset().await {
                Ok(ticket) => {
                    self.screen.clear_status();
                    self.spawn_load(ticket);
                }
                Err(e) => self.report_error("Could not clear stored data", &e),
            },
            ScreenAction::Quit => {
                if !self.session.is_completed() {
                    if let Err(e) = self.session.save().await {
                        tracing::error!(error = %e, "Failed to save form data on exit");
                    }
                }
                self.should_quit = true;
            }
        }
    }

    /// Apply finished content loads without blocking
    pub async fn apply_loads(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((ticket, result)) = self.loads_rx.try_recv() {
            if self.session.finish_load(&ticket, result).await {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until no load is pending
    pub async fn settle(&mut self) {
        while self.session.is_loading() {
            let Some((ticket, result)) = self.loads_rx.recv().await else {
                return;
            };
            self.session.finish_load(&ticket, result).await;
        }
        self.screen.sync(&self.session);
    }

    fn handle_transition(&mut self, result: Result<Transition, WizardError>) {
        match result {
            Ok(Transition::Moved(ticket)) => {
                self.screen.clear_status();
                self.spawn_load(ticket);
            }
            Ok(Transition::Completed) => {
                self.screen.clear_status();
                tracing::info!(
                    session = %self.session.id(),
                    sections = self.session.form_data().len(),
                    "Building setup completed"
                );
            }
            Ok(Transition::Unchanged) | Ok(Transition::Ignored) => {}
            Err(e) => self.report_error("Navigation failed", &e),
        }
    }

    fn spawn_load(&self, ticket: LoadTicket) {
        let provider = Arc::clone(&self.provider);
        let tx = self.loads_tx.clone();
        tracing::debug!(
            component = %ticket.component,
            generation = ticket.generation,
            "Fetching step content"
        );
        tokio::spawn(async move {
            let result = provider.fetch(&ticket.component).await;
            // Receiver is gone only when the app has shut down
            let _ = tx.send((ticket, result));
        });
    }

    fn report_error(&mut self, context: &str, error: &WizardError) {
        tracing::warn!(error = %error, "{context}");
        self.screen.set_status(format!("{context}: {error}"));
    }
}
