use gtk::prelude::*;
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;

use banter::models::Message;
use banter::services::chat::ChatState;

use crate::ui::input_area::{InputArea, InputAreaMsg, InputAreaOutput};
use crate::ui::message_widget::{MessageWidget, MessageWidgetInit, MessageWidgetMsg};

pub struct ChatView {
    messages: FactoryVecDeque<MessageWidget>,
    input_area: Controller<InputArea>,
    awaiting_reply: bool,
    ai_name: String,
    scrolled_window: gtk::ScrolledWindow,
}

#[derive(Debug)]
pub enum ChatViewMsg {
    /// Show exactly these messages, reusing rows that are still present.
    SyncMessages(Vec<Message>),
    SetChatState(ChatState),
    SetAiName(String),
    ScrollToBottom,
    // Forwarded from InputArea
    UserSendMessage(String),
    UserDraftChanged(String),
}

#[derive(Debug)]
pub enum ChatViewOutput {
    SendMessage(String),
    DraftChanged(String),
}

#[relm4::component(pub)]
impl Component for ChatView {
    type Init = String;
    type Input = ChatViewMsg;
    type Output = ChatViewOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Vertical,
            set_vexpand: true,

            #[local_ref]
            scrolled_window -> gtk::ScrolledWindow {
                set_vexpand: true,
                set_hscrollbar_policy: gtk::PolicyType::Never,

                #[local_ref]
                message_list -> gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 0,
                    set_margin_top: 8,
                    set_margin_bottom: 8,
                    set_margin_start: 16,
                    set_margin_end: 16,
                },
            },

            // Typing indicator
            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_halign: gtk::Align::Start,
                set_margin_start: 20,
                set_margin_bottom: 8,
                set_spacing: 8,
                #[watch]
                set_visible: model.awaiting_reply,

                gtk::Spinner {
                    set_spinning: true,
                },

                gtk::Label {
                    add_css_class: "dim-label",
                    #[watch]
                    set_label: &format!("{} is typing…", model.ai_name),
                },
            },

            gtk::Separator {
                set_orientation: gtk::Orientation::Horizontal,
            },

            append: model.input_area.widget(),
        }
    }

    fn init(
        ai_name: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let messages = FactoryVecDeque::builder()
            .launch(gtk::Box::default())
            .detach();

        let input_area = InputArea::builder()
            .launch(())
            .forward(sender.input_sender(), |output| match output {
                InputAreaOutput::SendMessage(text) => ChatViewMsg::UserSendMessage(text),
                InputAreaOutput::DraftChanged(text) => ChatViewMsg::UserDraftChanged(text),
            });

        let scrolled_window = gtk::ScrolledWindow::new();

        let model = Self {
            messages,
            input_area,
            awaiting_reply: false,
            ai_name,
            scrolled_window: scrolled_window.clone(),
        };

        let message_list = model.messages.widget();
        let widgets = view_output!();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            ChatViewMsg::SyncMessages(messages) => {
                if self.sync_messages(&messages) {
                    sender.input(ChatViewMsg::ScrollToBottom);
                }
            }
            ChatViewMsg::SetChatState(state) => {
                let awaiting = state == ChatState::AwaitingReply;
                let locked = awaiting || state == ChatState::LoadingHistory;
                self.awaiting_reply = awaiting;
                self.input_area.emit(InputAreaMsg::SetSending(locked));
                if awaiting {
                    sender.input(ChatViewMsg::ScrollToBottom);
                }
            }
            ChatViewMsg::SetAiName(name) => {
                if self.ai_name != name {
                    self.ai_name = name.clone();
                    let guard = self.messages.guard();
                    for i in 0..guard.len() {
                        guard.send(i, MessageWidgetMsg::SetAiName(name.clone()));
                    }
                }
            }
            ChatViewMsg::ScrollToBottom => {
                let adj = self.scrolled_window.vadjustment();
                glib::idle_add_local_once(move || {
                    adj.set_value(adj.upper());
                });
            }
            ChatViewMsg::UserSendMessage(text) => {
                let _ = sender.output(ChatViewOutput::SendMessage(text));
            }
            ChatViewMsg::UserDraftChanged(text) => {
                let _ = sender.output(ChatViewOutput::DraftChanged(text));
            }
        }
    }
}

impl ChatView {
    /// Drop rows evicted from the front, append new ones at the back, and
    /// rebuild if the two lists no longer line up. Returns whether rows were
    /// added.
    fn sync_messages(&mut self, messages: &[Message]) -> bool {
        let mut guard = self.messages.guard();

        let first_kept = messages
            .first()
            .and_then(|first| guard.iter().position(|w| w.message.id() == first.id()));
        match first_kept {
            Some(evicted) => {
                for _ in 0..evicted {
                    guard.pop_front();
                }
            }
            None => guard.clear(),
        }

        let aligned = guard.len() <= messages.len()
            && guard
                .iter()
                .zip(messages)
                .all(|(w, m)| w.message.id() == m.id());
        if !aligned {
            guard.clear();
        }

        let existing = guard.len();
        for message in &messages[existing..] {
            guard.push_back(MessageWidgetInit {
                message: message.clone(),
                ai_name: self.ai_name.clone(),
            });
        }

        messages.len() > existing
    }
}
