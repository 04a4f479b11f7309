use std::sync::Arc;

use adw::prelude::*;
use relm4::prelude::*;

use banter::api::{ApiError, ChatResponse, DeleteResponse, GraphQlClient, HistoryResponse};
use banter::config;
use banter::services::chat::{ChatSession, ChatState, PendingReply, ReplyTicket};
use banter::services::responder::Responder;
use banter::services::settings::{ChatSettings, ReplySource, Theme};

use crate::ui::chat_view::{ChatView, ChatViewMsg, ChatViewOutput};
use crate::ui::settings_panel::{SettingsPanel, SettingsPanelMsg, SettingsPanelOutput};

pub struct AppInit {
    pub graphql: Arc<GraphQlClient>,
}

pub struct App {
    session: ChatSession,
    graphql: Arc<GraphQlClient>,
    chat_view: Controller<ChatView>,
    settings_panel: Controller<SettingsPanel>,
    toast_overlay: adw::ToastOverlay,
    show_settings: bool,
}

#[derive(Debug)]
pub enum AppMsg {
    SendMessage(String),
    DraftChanged(String),
    ClearChat,
    ToggleTheme,
    ToggleSettings,
    SettingsChanged(ChatSettings),
    CheckConnection,
}

#[derive(Debug)]
pub enum AppCmd {
    ReplyDue(ReplyTicket),
    ReplyCancelled,
    BackendReply {
        ticket: ReplyTicket,
        response: ChatResponse,
    },
    HistoryLoaded(HistoryResponse),
    HistoryDeleted(DeleteResponse),
    HealthChecked(Result<String, ApiError>),
}

#[relm4::component(pub)]
impl Component for App {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();
    type CommandOutput = AppCmd;

    view! {
        adw::ApplicationWindow {
            set_title: Some(config::APP_NAME),
            set_default_width: 900,
            set_default_height: 760,
            set_width_request: 420,
            set_height_request: 480,

            #[local_ref]
            toast_overlay -> adw::ToastOverlay {
                adw::ToolbarView {
                    add_top_bar = &adw::HeaderBar {
                        #[wrap(Some)]
                        set_title_widget = &adw::WindowTitle::new(config::APP_NAME, "Online") {
                            #[watch]
                            set_title: model.session.settings().display_name(),
                            #[watch]
                            set_subtitle: match model.session.state() {
                                ChatState::AwaitingReply => "Typing…",
                                ChatState::LoadingHistory => "Loading history…",
                                ChatState::Idle | ChatState::Composing => "Online",
                            },
                        },

                        pack_end = &gtk::Button {
                            set_tooltip_text: Some("Settings"),
                            #[watch]
                            set_icon_name: if model.show_settings {
                                "go-up-symbolic"
                            } else {
                                "emblem-system-symbolic"
                            },
                            connect_clicked => AppMsg::ToggleSettings,
                        },

                        pack_end = &gtk::Button {
                            set_tooltip_text: Some("Toggle theme"),
                            #[watch]
                            set_icon_name: match model.session.settings().theme {
                                Theme::Light => "weather-clear-night-symbolic",
                                Theme::Dark => "weather-clear-symbolic",
                            },
                            connect_clicked => AppMsg::ToggleTheme,
                        },

                        pack_end = &gtk::Button {
                            set_icon_name: "user-trash-symbolic",
                            set_tooltip_text: Some("Clear chat"),
                            connect_clicked => AppMsg::ClearChat,
                        },
                    },

                    #[wrap(Some)]
                    set_content = &gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,

                        gtk::Revealer {
                            set_transition_type: gtk::RevealerTransitionType::SlideDown,
                            #[watch]
                            set_reveal_child: model.show_settings,
                            set_child: Some(model.settings_panel.widget()),
                        },

                        append: model.chat_view.widget(),
                    },
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let settings = ChatSettings::default();
        let session = ChatSession::new(settings.clone(), Responder::new());

        let chat_view = ChatView::builder()
            .launch(settings.display_name().to_string())
            .forward(sender.input_sender(), |output| match output {
                ChatViewOutput::SendMessage(text) => AppMsg::SendMessage(text),
                ChatViewOutput::DraftChanged(text) => AppMsg::DraftChanged(text),
            });

        let settings_panel = SettingsPanel::builder()
            .launch(settings.clone())
            .forward(sender.input_sender(), |output| match output {
                SettingsPanelOutput::SettingsChanged(s) => AppMsg::SettingsChanged(s),
                SettingsPanelOutput::CheckConnection => AppMsg::CheckConnection,
            });

        let toast_overlay = adw::ToastOverlay::new();
        toast_overlay.set_hexpand(true);
        toast_overlay.set_vexpand(true);

        apply_theme(settings.theme);

        let model = Self {
            session,
            graphql: init.graphql,
            chat_view,
            settings_panel,
            toast_overlay: toast_overlay.clone(),
            show_settings: false,
        };

        let widgets = view_output!();

        model.refresh_chat_view();

        tracing::info!("{} {} started", config::APP_NAME, config::VERSION);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            AppMsg::SendMessage(text) => match self.session.send(&text) {
                Ok(pending) => {
                    self.refresh_chat_view();
                    self.dispatch_reply(pending, &sender);
                }
                Err(e) => {
                    tracing::debug!("Send rejected: {}", e);
                }
            },
            AppMsg::DraftChanged(text) => {
                self.session.update_draft(&text);
            }
            AppMsg::ClearChat => {
                self.session.clear();
                self.refresh_chat_view();

                if self.session.settings().reply_source == ReplySource::Backend {
                    let client = self.graphql.clone();
                    sender.oneshot_command(async move {
                        AppCmd::HistoryDeleted(client.delete_history(None, None).await)
                    });
                }
            }
            AppMsg::ToggleTheme => {
                let mut settings = self.session.settings().clone();
                settings.toggle_theme();
                self.settings_panel.emit(SettingsPanelMsg::Sync(settings.clone()));
                self.apply_settings(settings, &sender);
            }
            AppMsg::ToggleSettings => {
                self.show_settings = !self.show_settings;
            }
            AppMsg::SettingsChanged(settings) => {
                self.apply_settings(settings, &sender);
            }
            AppMsg::CheckConnection => {
                let client = self.graphql.clone();
                sender.oneshot_command(async move {
                    AppCmd::HealthChecked(client.health_check().await)
                });
            }
        }
    }

    fn update_cmd(
        &mut self,
        msg: Self::CommandOutput,
        _sender: ComponentSender<Self>,
        _root: &Self::Root,
    ) {
        match msg {
            AppCmd::ReplyDue(ticket) => {
                if self.session.complete_simulated(ticket) {
                    self.refresh_chat_view();
                }
            }
            AppCmd::ReplyCancelled => {}
            AppCmd::BackendReply { ticket, response } => {
                let delivered = match (&response.message, response.success) {
                    (Some(message), true) => self.session.complete_with(
                        ticket,
                        message.content(),
                        message.model().map(str::to_string),
                    ),
                    _ => {
                        let error = response
                            .error
                            .unwrap_or_else(|| "The server sent no reply".to_string());
                        tracing::error!("Backend reply failed: {}", error);
                        self.show_toast(&error);
                        self.session.abandon(ticket)
                    }
                };
                if delivered {
                    self.refresh_chat_view();
                }
            }
            AppCmd::HistoryLoaded(history) => {
                if history.success {
                    self.session.load_history(history.messages);
                } else {
                    self.session.abort_history_load();
                    let error = history.error.unwrap_or_default();
                    tracing::error!("Failed to load history: {}", error);
                    self.show_toast(&format!("Could not load history: {}", error));
                }
                self.refresh_chat_view();
            }
            AppCmd::HistoryDeleted(result) => {
                if result.success {
                    tracing::info!(
                        "Deleted remote history ({} messages)",
                        result.deleted_count.as_deref().unwrap_or("?")
                    );
                } else {
                    tracing::error!("Failed to delete history: {}", result.message);
                    self.show_toast(&format!("Could not delete history: {}", result.message));
                }
            }
            AppCmd::HealthChecked(result) => {
                let status = match result {
                    Ok(health) => format!("Connected: {}", health),
                    Err(e) => {
                        tracing::error!("Health check failed: {}", e);
                        format!("Unreachable: {}", e)
                    }
                };
                self.settings_panel.emit(SettingsPanelMsg::ConnectionChecked(status));
            }
        }
    }
}

impl App {
    /// Start waiting for the reply owed to a just-sent message, from whichever
    /// source the settings select.
    fn dispatch_reply(&self, pending: PendingReply, sender: &ComponentSender<Self>) {
        match self.session.settings().reply_source {
            ReplySource::Simulated => {
                sender.oneshot_command(async move {
                    match pending.elapsed().await {
                        Some(ticket) => AppCmd::ReplyDue(ticket),
                        None => AppCmd::ReplyCancelled,
                    }
                });
            }
            ReplySource::Backend => {
                let client = self.graphql.clone();
                sender.oneshot_command(async move {
                    tokio::select! {
                        _ = pending.cancel.cancelled() => AppCmd::ReplyCancelled,
                        response = client.send_message(&pending.prompt, None) => {
                            AppCmd::BackendReply {
                                ticket: pending.ticket,
                                response,
                            }
                        }
                    }
                });
            }
        }
    }

    fn apply_settings(&mut self, settings: ChatSettings, sender: &ComponentSender<Self>) {
        let previous = self.session.settings().clone();
        apply_theme(settings.theme);
        self.chat_view.emit(ChatViewMsg::SetAiName(settings.display_name().to_string()));

        let switched_to_backend = previous.reply_source != ReplySource::Backend
            && settings.reply_source == ReplySource::Backend;

        self.session.apply_settings(settings);
        if switched_to_backend {
            self.session.begin_history_load();
        }
        self.refresh_chat_view();

        if switched_to_backend {
            let client = self.graphql.clone();
            sender.oneshot_command(async move {
                AppCmd::HistoryLoaded(client.get_chat_history(None).await)
            });
        }
    }

    fn refresh_chat_view(&self) {
        self.chat_view.emit(ChatViewMsg::SyncMessages(self.session.messages().to_vec()));
        self.chat_view.emit(ChatViewMsg::SetChatState(self.session.state()));
    }

    fn show_toast(&self, text: &str) {
        self.toast_overlay.add_toast(adw::Toast::new(text));
    }
}

pub fn apply_theme(theme: Theme) {
    let style_manager = adw::StyleManager::default();
    style_manager.set_color_scheme(match theme {
        Theme::Light => adw::ColorScheme::ForceLight,
        Theme::Dark => adw::ColorScheme::ForceDark,
    });
}
