use gtk::prelude::*;
use relm4::prelude::*;

pub struct InputArea {
    buffer: gtk::TextBuffer,
    sending: bool,
    char_count: i32,
}

#[derive(Debug)]
pub enum InputAreaMsg {
    SendClicked,
    SetSending(bool),
    // Internal
    TextChanged,
}

#[derive(Debug)]
pub enum InputAreaOutput {
    SendMessage(String),
    DraftChanged(String),
}

#[relm4::component(pub)]
impl Component for InputArea {
    type Init = ();
    type Input = InputAreaMsg;
    type Output = InputAreaOutput;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,
            set_spacing: 8,
            set_margin_top: 8,
            set_margin_bottom: 8,
            set_margin_start: 12,
            set_margin_end: 12,
            add_css_class: "input-card",

            // Text input with placeholder overlay
            gtk::Overlay {
                set_hexpand: true,

                gtk::ScrolledWindow {
                    set_hexpand: true,
                    set_max_content_height: 150,
                    set_propagate_natural_height: true,
                    set_min_content_height: 40,

                    #[name = "text_view"]
                    gtk::TextView {
                        set_wrap_mode: gtk::WrapMode::WordChar,
                        set_accepts_tab: false,
                        set_top_margin: 8,
                        set_bottom_margin: 8,
                        set_left_margin: 8,
                        set_right_margin: 8,
                        set_buffer: Some(&model.buffer),
                        #[watch]
                        set_sensitive: !model.sending,
                    },
                },

                add_overlay = &gtk::Label {
                    set_label: "Type a message… (Shift+Enter for a new line)",
                    set_halign: gtk::Align::Start,
                    set_valign: gtk::Align::Start,
                    set_margin_start: 12,
                    set_margin_top: 8,
                    set_can_target: false,
                    add_css_class: "dim-label",
                    #[watch]
                    set_visible: model.char_count == 0,
                },
            },

            gtk::Button {
                set_icon_name: "go-up-symbolic",
                set_tooltip_text: Some("Send message (Enter)"),
                set_valign: gtk::Align::End,
                add_css_class: "suggested-action",
                add_css_class: "circular",
                #[watch]
                set_sensitive: !model.sending && model.has_text(),
                connect_clicked => InputAreaMsg::SendClicked,
            },
        }
    }

    fn init(
        _init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let buffer = gtk::TextBuffer::new(None::<&gtk::TextTagTable>);

        let model = Self {
            buffer: buffer.clone(),
            sending: false,
            char_count: 0,
        };

        let widgets = view_output!();

        // Enter sends, Shift+Enter inserts a newline
        let sender_key = sender.clone();
        let key_controller = gtk::EventControllerKey::new();
        key_controller.connect_key_pressed(move |_, key, _code, modifier| {
            let is_enter = key == gtk::gdk::Key::Return || key == gtk::gdk::Key::KP_Enter;
            if is_enter && !modifier.contains(gtk::gdk::ModifierType::SHIFT_MASK) {
                sender_key.input(InputAreaMsg::SendClicked);
                gtk::glib::Propagation::Stop
            } else {
                gtk::glib::Propagation::Proceed
            }
        });
        widgets.text_view.add_controller(key_controller);

        let sender_buf = sender.clone();
        buffer.connect_changed(move |_| {
            sender_buf.input(InputAreaMsg::TextChanged);
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            InputAreaMsg::SendClicked => {
                let text = self.get_text();
                if !text.trim().is_empty() && !self.sending {
                    let _ = sender.output(InputAreaOutput::SendMessage(text));
                    self.buffer.set_text("");
                }
            }
            InputAreaMsg::SetSending(sending) => {
                self.sending = sending;
            }
            InputAreaMsg::TextChanged => {
                self.char_count = self.buffer.char_count();
                let _ = sender.output(InputAreaOutput::DraftChanged(self.get_text()));
            }
        }
    }
}

impl InputArea {
    fn get_text(&self) -> String {
        let start = self.buffer.start_iter();
        let end = self.buffer.end_iter();
        self.buffer.text(&start, &end, false).to_string()
    }

    fn has_text(&self) -> bool {
        !self.get_text().trim().is_empty()
    }
}
