//! Main application UI.
//! Renders the session screens and forwards every user action to the session.

use eframe::egui::{self, Color32, RichText};
use flipcards_app::config::Config;
use flipcards_app::database::db;
use flipcards_app::models::{AccuracyBand, Action, Feedback, MAX_OPTION_KEY, Mode, Session, Theme};
use flipcards_app::source::{PendingLoad, SourceLocation, spawn_load};
use rusqlite::Connection;
use std::time::{Duration, Instant};

/// Time the "New Set of Cards" spinner stays up. Purely cosmetic.
const RESHUFFLE_SETTLE: Duration = Duration::from_millis(800);

const GREEN: Color32 = Color32::from_rgb(34, 197, 94);
const RED: Color32 = Color32::from_rgb(239, 68, 68);
const YELLOW: Color32 = Color32::from_rgb(234, 179, 8);

/// Keys the app listens to while a round is on screen
const KEYS: [egui::Key; 9] = [
    egui::Key::Space,
    egui::Key::Enter,
    egui::Key::ArrowRight,
    egui::Key::ArrowLeft,
    egui::Key::L,
    egui::Key::Num1,
    egui::Key::Num2,
    egui::Key::Num3,
    egui::Key::Num4,
];

/// Keyboard shortcuts for the five action kinds
pub fn action_for_key(key: egui::Key) -> Option<Action> {
    let action = match key {
        egui::Key::Space | egui::Key::Enter => Action::Flip,
        egui::Key::ArrowRight => Action::Next,
        egui::Key::ArrowLeft => Action::Previous,
        egui::Key::L => Action::MarkLearned,
        egui::Key::Num1 => Action::SelectOption(1),
        egui::Key::Num2 => Action::SelectOption(2),
        egui::Key::Num3 => Action::SelectOption(3),
        egui::Key::Num4 => Action::SelectOption(MAX_OPTION_KEY),
        _ => return None,
    };
    Some(action)
}

/// Card collection loading states
enum LoadState {
    Loading(PendingLoad),
    Failed(String),
    Ready,
}

/// Deferred UI requests, executed after rendering to avoid borrowing conflicts
enum Command {
    Enter(Mode),
    Home,
    Apply(Action),
    Select(String),
    NewRound,
    ToggleTheme,
    OpenDeck,
    Reload,
}

pub struct FlipCardsApp {
    session: Session,
    cards_per_round: usize,
    location: SourceLocation,
    load: LoadState,
    conn: Option<Connection>,
    theme: Theme,
    reaction: Option<Feedback>,
    reshuffle_started: Option<Instant>,
}

impl eframe::App for FlipCardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();
        self.settle_reshuffle(ctx);

        let mut commands = Vec::new();
        match &self.load {
            LoadState::Loading(pending) => render_loading(ctx, pending.location()),
            LoadState::Failed(message) => render_error(ctx, message, &mut commands),
            LoadState::Ready => {
                if matches!(self.session.mode(), Mode::Study | Mode::Quiz) {
                    commands.extend(read_keys(ctx));
                }
                match self.session.mode() {
                    Mode::Home => self.render_home(ctx, &mut commands),
                    Mode::Study | Mode::Quiz => self.render_round(ctx, &mut commands),
                    Mode::Results => self.render_results(ctx, &mut commands),
                }
            }
        }

        for command in commands {
            self.execute(ctx, command);
        }
    }
}

impl FlipCardsApp {
    /// Creates the app and starts loading the configured card source
    pub fn new(cc: &eframe::CreationContext<'_>, config: &Config, conn: Option<Connection>) -> Self {
        let theme = conn
            .as_ref()
            .and_then(|c| db::get_theme(c).ok())
            .unwrap_or_default();
        let last_deck = conn.as_ref().and_then(|c| db::get_last_deck(c).ok().flatten());
        let location = config.source_or(last_deck.as_deref());

        apply_theme(&cc.egui_ctx, theme);
        let load = LoadState::Loading(start_load(&cc.egui_ctx, &location));

        Self {
            session: Session::new(config.cards_per_round),
            cards_per_round: config.cards_per_round,
            location,
            load,
            conn,
            theme,
            reaction: None,
            reshuffle_started: None,
        }
    }

    fn poll_load(&mut self) {
        let LoadState::Loading(pending) = &self.load else {
            return;
        };
        let Some(result) = pending.poll() else {
            return;
        };
        self.load = match result.and_then(|cards| self.session.attach_cards(cards)) {
            Ok(()) => LoadState::Ready,
            Err(e) => {
                tracing::error!(error = %e, "could not start a session");
                LoadState::Failed(e.to_string())
            }
        };
    }

    fn settle_reshuffle(&mut self, ctx: &egui::Context) {
        let Some(started) = self.reshuffle_started else {
            return;
        };
        let elapsed = started.elapsed();
        if elapsed >= RESHUFFLE_SETTLE {
            self.session.finish_reshuffle();
            self.reshuffle_started = None;
        } else {
            ctx.request_repaint_after(RESHUFFLE_SETTLE - elapsed);
        }
    }

    fn execute(&mut self, ctx: &egui::Context, command: Command) {
        let feedback = match command {
            Command::Enter(mode) => self.session.enter_mode(mode),
            Command::Home => {
                self.session.go_home();
                None
            }
            Command::Apply(action) => self.session.apply(action),
            Command::Select(option) => self.session.select_answer(&option),
            Command::NewRound => {
                let feedback = self.session.new_round();
                if self.session.is_reshuffling() && self.reshuffle_started.is_none() {
                    self.reshuffle_started = Some(Instant::now());
                    ctx.request_repaint_after(RESHUFFLE_SETTLE);
                }
                feedback
            }
            Command::ToggleTheme => {
                self.toggle_theme(ctx);
                return;
            }
            Command::OpenDeck => {
                self.open_deck(ctx);
                return;
            }
            Command::Reload => {
                self.reload(ctx);
                return;
            }
        };
        if let Some(f) = &feedback {
            tracing::debug!(feedback = ?f, "session feedback");
        }
        self.reaction = feedback;
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = self.theme.toggled();
        apply_theme(ctx, self.theme);
        if let Some(conn) = &self.conn {
            if let Err(e) = db::set_theme(self.theme, conn) {
                tracing::warn!(error = %e, "could not save theme");
            }
        }
    }

    /// Lets the user pick a JSON deck and starts a fresh session from it
    fn open_deck(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };
        self.location = SourceLocation::File(path);
        if let Some(conn) = &self.conn {
            if let Err(e) = db::set_last_deck(&self.location.to_string(), conn) {
                tracing::warn!(error = %e, "could not remember deck");
            }
        }
        self.reload(ctx);
    }

    /// Discards the session and loads the card source again
    fn reload(&mut self, ctx: &egui::Context) {
        self.session = Session::new(self.cards_per_round);
        self.reaction = None;
        self.reshuffle_started = None;
        self.load = LoadState::Loading(start_load(ctx, &self.location));
    }

    /// Renders the home screen with mode selection
    fn render_home(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Deck: {}", self.location));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    theme_button(ui, self.theme, commands);
                });
            });
            ui.separator();

            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading(RichText::new("FlipCards").size(36.0).strong());
                ui.add_space(30.0);

                if ui
                    .add_sized([260.0, 60.0], egui::Button::new(RichText::new("📖 Study Mode").size(20.0)))
                    .on_hover_text("Review flashcards at your own pace")
                    .clicked()
                {
                    commands.push(Command::Enter(Mode::Study));
                }
                ui.add_space(10.0);
                if ui
                    .add_sized([260.0, 60.0], egui::Button::new(RichText::new("🧠 Quiz Mode").size(20.0)))
                    .on_hover_text("Test your knowledge with multiple choice")
                    .clicked()
                {
                    commands.push(Command::Enter(Mode::Quiz));
                }
                ui.add_space(10.0);
                if ui.button("📂 Open Deck...").clicked() {
                    commands.push(Command::OpenDeck);
                }

                ui.add_space(30.0);
                ui.weak(format!(
                    "Each round features {} random flashcards from the collection of {}",
                    self.session.cards_per_round().min(self.session.total_cards()),
                    self.session.total_cards()
                ));
                ui.weak("Press arrow keys to navigate, space to flip cards");

                if self.session.learned_count() > 0 {
                    ui.add_space(10.0);
                    ui.label(
                        RichText::new(format!(
                            "You've learned {} out of {} cards",
                            self.session.learned_count(),
                            self.session.round().len()
                        ))
                        .strong(),
                    );
                }
            });
        });
    }

    /// Renders a study or quiz card with its controls
    fn render_round(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        let session = &self.session;
        let mode = session.mode();
        let round_len = session.round().len();
        let busy = session.is_reshuffling();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🏠 Home").clicked() {
                    commands.push(Command::Home);
                }
                ui.heading(mode.to_string());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    theme_button(ui, self.theme, commands);
                });
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.label(format!("Card {} of {}", session.current_index() + 1, round_len));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if mode == Mode::Study {
                        ui.label(format!("Learned: {}/{}", session.learned_count(), round_len));
                    } else {
                        ui.label(format!("Score: {}/{}", session.score(), session.attempts()));
                    }
                });
            });
            ui.add(egui::ProgressBar::new(session.progress_fraction()));
            ui.add_space(10.0);

            ui.vertical_centered(|ui| {
                let label = if busy { "🔀 Shuffling..." } else { "🔀 New Set of Cards" };
                if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
                    commands.push(Command::NewRound);
                }
            });
            ui.add_space(10.0);

            if busy {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.spinner();
                });
                return;
            }

            let Some(card) = session.current_card() else {
                return;
            };

            // The card itself; clicking it flips
            let (face, text) = if session.is_revealed() {
                ("Answer", card.answer.as_str())
            } else {
                ("Question", card.question.as_str())
            };
            ui.vertical_centered(|ui| {
                ui.weak(face);
                let width = ui.available_width().min(420.0);
                let flip = ui
                    .add_sized(
                        [width, 180.0],
                        egui::Button::new(RichText::new(text).size(20.0).strong()),
                    )
                    .on_hover_text("Click to flip");
                if flip.clicked() {
                    commands.push(Command::Apply(Action::Flip));
                }
            });
            ui.add_space(10.0);

            if mode == Mode::Quiz && card.has_options() {
                let selected = session.selected_option();
                for (i, option) in card.options().iter().enumerate() {
                    let mut button = egui::Button::new(format!("{}   {}", i + 1, option));
                    if selected == Some(option.as_str()) {
                        let (fill, mark) = if card.is_correct(option) {
                            (GREEN, "✔")
                        } else {
                            (RED, "✖")
                        };
                        let text = RichText::new(format!("{}   {}   {}", i + 1, option, mark))
                            .color(Color32::WHITE);
                        button = egui::Button::new(text).fill(fill);
                    }
                    let width = ui.available_width();
                    let response = ui.add_enabled_ui(selected.is_none(), |ui| {
                        ui.add_sized([width, 32.0], button)
                    });
                    if response.inner.clicked() {
                        commands.push(Command::Select(option.clone()));
                    }
                }
                ui.add_space(10.0);
            }

            if let Some(feedback) = &self.reaction {
                let color = if feedback.is_positive() {
                    GREEN
                } else if feedback.is_negative() {
                    RED
                } else {
                    YELLOW
                };
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(feedback.to_string()).color(color).size(18.0).strong());
                });
                ui.add_space(10.0);
            }

            ui.horizontal(|ui| {
                if ui.button("◀ Previous").clicked() {
                    commands.push(Command::Apply(Action::Previous));
                }
                if mode == Mode::Study {
                    let learned = session.is_learned(session.current_index());
                    if ui.add_enabled(!learned, egui::Button::new("✔ Learned")).clicked() {
                        commands.push(Command::Apply(Action::MarkLearned));
                    }
                }
                if ui.button("Next ▶").clicked() {
                    commands.push(Command::Apply(Action::Next));
                }
            });

            ui.add_space(20.0);
            let hint = if mode == Mode::Study {
                "L Mark as Learned"
            } else {
                "1-4 Select Answer"
            };
            ui.weak(format!(
                "Keyboard shortcuts: ← Previous | → Next | Space Flip | {hint}"
            ));
        });
    }

    /// Renders the end-of-quiz summary
    fn render_results(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        let Some(summary) = self.session.summary() else {
            return;
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.heading(RichText::new("Quiz Results").size(28.0).strong());
                ui.add_space(20.0);

                ui.group(|ui| {
                    ui.label(
                        RichText::new(format!("Score: {} / {}", summary.score, summary.round_len))
                            .size(18.0),
                    );
                });
                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.label(RichText::new(format!("Accuracy: {}%", summary.accuracy)).size(18.0));
                    let fill = match summary.band() {
                        AccuracyBand::Strong => GREEN,
                        AccuracyBand::Fair => YELLOW,
                        AccuracyBand::Weak => RED,
                    };
                    ui.add(
                        egui::ProgressBar::new(f32::from(summary.accuracy) / 100.0)
                            .desired_width(300.0)
                            .fill(fill),
                    );
                });

                if summary.has_missed() {
                    ui.add_space(10.0);
                    ui.group(|ui| {
                        ui.label(RichText::new("Questions to review:").strong());
                        for card in &summary.missed {
                            ui.label(format!("• {}", card.question));
                        }
                    });
                }

                ui.add_space(20.0);
                ui.horizontal(|ui| {
                    if ui.button("🏠 Home").clicked() {
                        commands.push(Command::Home);
                    }
                    if ui.button("🔄 Try Again").clicked() {
                        commands.push(Command::NewRound);
                    }
                });
            });
        });
    }
}

fn start_load(ctx: &egui::Context, location: &SourceLocation) -> PendingLoad {
    let ctx = ctx.clone();
    spawn_load(location.clone().into_source(), move || ctx.request_repaint())
}

fn apply_theme(ctx: &egui::Context, theme: Theme) {
    ctx.set_visuals(if theme.is_dark() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
}

fn theme_button(ui: &mut egui::Ui, theme: Theme, commands: &mut Vec<Command>) {
    let (icon, hint) = if theme.is_dark() {
        ("☀", "Switch to light mode")
    } else {
        ("🌙", "Switch to dark mode")
    };
    if ui.button(icon).on_hover_text(hint).clicked() {
        commands.push(Command::ToggleTheme);
    }
}

fn read_keys(ctx: &egui::Context) -> Vec<Command> {
    ctx.input(|i| {
        KEYS.iter()
            .filter(|key| i.key_pressed(**key))
            .filter_map(|key| action_for_key(*key))
            .map(Command::Apply)
            .collect()
    })
}

fn render_loading(ctx: &egui::Context, location: &str) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.spinner();
            ui.label(RichText::new("Loading flashcards...").size(18.0));
            ui.weak(location);
        });
    });
}

/// Terminal error screen. The only way out is a manual reload.
fn render_error(ctx: &egui::Context, message: &str, commands: &mut Vec<Command>) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.label(RichText::new("Error!").color(RED).size(22.0).strong());
            ui.label(RichText::new(message).color(RED));
            ui.add_space(20.0);
            if ui.button("🔄 Try Again").clicked() {
                commands.push(Command::Reload);
            }
            if ui.button("📂 Open Deck...").clicked() {
                commands.push(Command::OpenDeck);
            }
        });
    });
}
