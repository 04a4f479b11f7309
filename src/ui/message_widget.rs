use chrono::Local;
use gtk::prelude::*;
use relm4::prelude::*;

use banter::models::{Message, Sender};

pub struct MessageWidgetInit {
    pub message: Message,
    pub ai_name: String,
}

pub struct MessageWidget {
    pub message: Message,
    ai_name: String,
}

#[derive(Debug)]
pub enum MessageWidgetMsg {
    SetAiName(String),
}

#[relm4::factory(pub)]
impl FactoryComponent for MessageWidget {
    type Init = MessageWidgetInit;
    type Input = MessageWidgetMsg;
    type Output = ();
    type CommandOutput = ();
    type ParentWidget = gtk::Box;

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,
            set_margin_top: 6,
            set_margin_bottom: 6,
            set_halign: if self.message.is_user() { gtk::Align::End } else { gtk::Align::Start },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 4,
                add_css_class: "card",
                add_css_class: if self.message.is_user() {
                    "message-bubble-user"
                } else {
                    "message-bubble-assistant"
                },

                // Sender label + timestamp
                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 8,
                    set_margin_start: 12,
                    set_margin_end: 12,
                    set_margin_top: 8,

                    gtk::Label {
                        set_halign: gtk::Align::Start,
                        set_hexpand: true,
                        add_css_class: "caption",
                        add_css_class: "dim-label",
                        #[watch]
                        set_label: self.sender_label(),
                    },

                    gtk::Label {
                        set_halign: gtk::Align::End,
                        add_css_class: "caption",
                        add_css_class: "dim-label",
                        set_label: &self.time_label(),
                    },
                },

                gtk::Label {
                    set_label: self.message.content(),
                    set_halign: gtk::Align::Start,
                    set_xalign: 0.0,
                    set_wrap: true,
                    set_wrap_mode: gtk::pango::WrapMode::WordChar,
                    set_max_width_chars: 60,
                    set_selectable: true,
                    set_margin_start: 12,
                    set_margin_end: 12,
                    set_margin_bottom: 10,
                },
            },
        }
    }

    fn init_model(init: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        Self {
            message: init.message,
            ai_name: init.ai_name,
        }
    }

    fn update(&mut self, msg: Self::Input, _sender: FactorySender<Self>) {
        match msg {
            MessageWidgetMsg::SetAiName(name) => {
                self.ai_name = name;
            }
        }
    }
}

impl MessageWidget {
    fn sender_label(&self) -> &str {
        match self.message.sender() {
            Sender::User => "You",
            Sender::Ai => self.message.model().unwrap_or(&self.ai_name),
        }
    }

    fn time_label(&self) -> String {
        self.message
            .timestamp()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }
}
