use glam::Vec2;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;

/// One frame's worth of discrete input, in the order SDL delivered it.
/// Pointer events carry window-space coordinates (origin top-left, y down).
#[derive(Clone, Copy)]
pub enum InputEvent {
    KeyPressed(Scancode),
    PointerDown(Vec2),
    PointerMoved(Vec2),
    PointerUp(Vec2),
}

pub struct InputState {
    pub events: Vec<InputEvent>,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            quit: false,
        }
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.events.clear();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.quit = true,
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => self.quit = true,
                Event::KeyDown {
                    scancode: Some(sc), ..
                } => {
                    self.events.push(InputEvent::KeyPressed(sc));
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    self.events
                        .push(InputEvent::PointerDown(Vec2::new(x as f32, y as f32)));
                }
                Event::MouseMotion { x, y, .. } => {
                    self.events
                        .push(InputEvent::PointerMoved(Vec2::new(x as f32, y as f32)));
                }
                Event::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    self.events
                        .push(InputEvent::PointerUp(Vec2::new(x as f32, y as f32)));
                }
                _ => {}
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}

// ---------------------------------------------------------------------------
// Gesture recognition
// ---------------------------------------------------------------------------

/// Squared pixel distance the pointer may wander from its press origin before
/// the press stops counting as a tap and becomes a pan.
const TAP_SLOP_SQ: f32 = 8.0 * 8.0;

/// Pointer gestures distilled from raw input events.
#[derive(Clone, Copy)]
pub enum Gesture {
    /// Press and release without leaving the slop radius. `at` is the press
    /// origin, not the release point.
    Tap { at: Vec2 },
    /// Pointer dragged beyond the slop radius. Fired on every motion frame
    /// while the button stays down.
    #[allow(dead_code)]
    Pan { at: Vec2, delta: Vec2 },
    /// Button released after dragging.
    #[allow(dead_code)]
    PanEnd { at: Vec2 },
}

/// Turns a frame's pointer events into discrete gestures. A pure state
/// machine over [`InputEvent`]s, so SDL never leaks past this module.
pub struct GestureRecognizer {
    press_origin: Option<Vec2>,
    last_position: Vec2,
    panning: bool,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self {
            press_origin: None,
            last_position: Vec2::ZERO,
            panning: false,
        }
    }

    /// Feed one frame of events, returning the gestures recognized this
    /// frame in delivery order.
    pub fn feed(&mut self, events: &[InputEvent]) -> Vec<Gesture> {
        let mut gestures = Vec::new();

        for event in events {
            match *event {
                InputEvent::PointerDown(at) => {
                    self.press_origin = Some(at);
                    self.last_position = at;
                    self.panning = false;
                }
                InputEvent::PointerMoved(at) => {
                    // Motion with no button down is not gesture material.
                    if let Some(origin) = self.press_origin {
                        if !self.panning && (at - origin).length_squared() > TAP_SLOP_SQ {
                            self.panning = true;
                        }
                        if self.panning {
                            gestures.push(Gesture::Pan {
                                at,
                                delta: at - self.last_position,
                            });
                        }
                        self.last_position = at;
                    }
                }
                InputEvent::PointerUp(at) => {
                    if let Some(origin) = self.press_origin {
                        if self.panning {
                            gestures.push(Gesture::PanEnd { at });
                        } else {
                            gestures.push(Gesture::Tap { at: origin });
                        }
                    }
                    self.press_origin = None;
                    self.panning = false;
                }
                InputEvent::KeyPressed(_) => {}
            }
        }

        gestures
    }
}
