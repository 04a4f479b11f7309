use adw::prelude::*;
use relm4::prelude::*;

use banter::services::settings::{
    ChatSettings, ReplySource, Theme, MAX_MAX_MESSAGES, MIN_MAX_MESSAGES,
};

pub struct SettingsPanel {
    settings: ChatSettings,
    connection_status: String,
    checking: bool,
}

#[derive(Debug)]
pub enum SettingsPanelMsg {
    AiNameChanged(String),
    MaxMessagesChanged(f64),
    DarkThemeToggled(bool),
    BackendToggled(bool),
    CheckConnection,
    /// Result of a health check, ready for display.
    ConnectionChecked(String),
    /// Settings changed elsewhere (e.g. the header theme toggle).
    Sync(ChatSettings),
}

#[derive(Debug)]
pub enum SettingsPanelOutput {
    SettingsChanged(ChatSettings),
    CheckConnection,
}

#[relm4::component(pub)]
impl Component for SettingsPanel {
    type Init = ChatSettings;
    type Input = SettingsPanelMsg;
    type Output = SettingsPanelOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_margin_top: 12,
            set_margin_bottom: 12,
            set_margin_start: 16,
            set_margin_end: 16,

            adw::PreferencesGroup {
                set_title: "Settings",

                #[name = "name_row"]
                adw::EntryRow {
                    set_title: "Assistant name",
                    set_text: &model.settings.ai_name,
                    connect_changed[sender] => move |row| {
                        sender.input(SettingsPanelMsg::AiNameChanged(row.text().to_string()));
                    },
                },

                #[name = "max_messages_row"]
                adw::SpinRow::with_range(MIN_MAX_MESSAGES as f64, MAX_MAX_MESSAGES as f64, 1.0) {
                    set_title: "Maximum messages",
                    set_subtitle: "Older messages are dropped beyond this limit",
                    set_value: model.settings.max_messages() as f64,
                    connect_value_notify[sender] => move |row| {
                        sender.input(SettingsPanelMsg::MaxMessagesChanged(row.value()));
                    },
                },

                #[name = "theme_row"]
                adw::SwitchRow {
                    set_title: "Dark theme",
                    #[watch]
                    set_active: model.settings.theme.is_dark(),
                    connect_active_notify[sender] => move |row| {
                        sender.input(SettingsPanelMsg::DarkThemeToggled(row.is_active()));
                    },
                },

                #[name = "backend_row"]
                adw::SwitchRow {
                    set_title: "Backend replies",
                    set_subtitle: "Send messages to the chat server instead of simulating replies",
                    set_active: model.settings.reply_source == ReplySource::Backend,
                    connect_active_notify[sender] => move |row| {
                        sender.input(SettingsPanelMsg::BackendToggled(row.is_active()));
                    },
                },

                adw::ActionRow {
                    set_title: "Backend connection",
                    #[watch]
                    set_subtitle: &model.connection_status,

                    add_suffix = &gtk::Button {
                        set_label: "Check",
                        set_valign: gtk::Align::Center,
                        #[watch]
                        set_sensitive: !model.checking,
                        connect_clicked => SettingsPanelMsg::CheckConnection,
                    },
                },
            },
        }
    }

    fn init(
        settings: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let model = Self {
            settings,
            connection_status: "Not checked".to_string(),
            checking: false,
        };
        let widgets = view_output!();
        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            SettingsPanelMsg::AiNameChanged(name) => {
                self.settings.ai_name = name;
                self.emit_changed(&sender);
            }
            SettingsPanelMsg::MaxMessagesChanged(value) => {
                self.settings.set_max_messages(value.round() as usize);
                self.emit_changed(&sender);
            }
            SettingsPanelMsg::DarkThemeToggled(dark) => {
                let theme = if dark { Theme::Dark } else { Theme::Light };
                if self.settings.theme != theme {
                    self.settings.theme = theme;
                    self.emit_changed(&sender);
                }
            }
            SettingsPanelMsg::BackendToggled(enabled) => {
                self.settings.reply_source = if enabled {
                    ReplySource::Backend
                } else {
                    ReplySource::Simulated
                };
                self.emit_changed(&sender);
            }
            SettingsPanelMsg::CheckConnection => {
                self.checking = true;
                self.connection_status = "Checking…".to_string();
                let _ = sender.output(SettingsPanelOutput::CheckConnection);
            }
            SettingsPanelMsg::ConnectionChecked(status) => {
                self.checking = false;
                self.connection_status = status;
            }
            SettingsPanelMsg::Sync(settings) => {
                self.settings = settings;
            }
        }
    }
}

impl SettingsPanel {
    fn emit_changed(&self, sender: &ComponentSender<Self>) {
        let _ = sender.output(SettingsPanelOutput::SettingsChanged(self.settings.clone()));
    }
}
