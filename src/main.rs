mod camera;
mod components;
mod engine;
mod fsm;
mod renderer;
mod scene;
mod systems;

use camera::Camera;
use clap::Parser;
use engine::input::{Gesture, GestureRecognizer, InputEvent, InputState};
use engine::time::FrameTimer;
use engine::window::GameWindow;
use hecs::World;
use renderer::Renderer;
use scene::arena::load_arena;
use sdl2::keyboard::Scancode;
use systems::{
    animation_system, collision_system, command_walk, contact_interrupt_system,
    set_walking_allowed, walk_system,
};

#[derive(Parser)]
#[command(name = "amble", about = "Tap-to-walk character demo")]
struct Args {
    /// Walker speed in world units per second
    #[arg(long, default_value_t = 5.0)]
    walk_speed: f32,

    /// Seconds of sustained contact before a walk is interrupted
    #[arg(long, default_value_t = 0.5)]
    stop_contact: f32,
}

fn main() {
    let args = Args::parse();
    let sdl = sdl2::init().expect("Failed to init SDL2");
    let window = GameWindow::new(&sdl, "Amble", 1280, 720);

    let mut renderer = Renderer::init();

    let mut world = World::new();
    let (meshes, walker) = load_arena(&mut world, args.walk_speed, args.stop_contact);

    let mut event_pump = sdl.event_pump().expect("Failed to get event pump");
    let mut input = InputState::new();
    let mut gestures = GestureRecognizer::new();
    let mut timer = FrameTimer::new();
    let camera = Camera::new();
    let mut walking_allowed = true;

    loop {
        timer.tick();
        input.update(&mut event_pump);

        if input.should_quit() {
            break;
        }

        // Space toggles walking permission; revoking cancels any active walk
        // before this frame moves anything.
        for event in &input.events {
            if let InputEvent::KeyPressed(Scancode::Space) = event {
                walking_allowed = !walking_allowed;
                set_walking_allowed(&mut world, walker, walking_allowed);
                #[cfg(debug_assertions)]
                println!("[control] walking_allowed = {}", walking_allowed);
            }
        }

        for gesture in gestures.feed(&input.events) {
            match gesture {
                Gesture::Tap { at } => {
                    let destination = camera.screen_to_world(at, window.size());
                    command_walk(&mut world, walker, destination);
                }
                // Pans and their endings never command movement.
                Gesture::Pan { .. } | Gesture::PanEnd { .. } => {}
            }
        }

        walk_system(&mut world, timer.dt);
        let collision_events = collision_system(&mut world);
        contact_interrupt_system(&mut world, &collision_events, timer.dt);
        animation_system(&mut world, timer.dt);

        let view = camera.view_matrix();
        let proj = camera.projection_matrix(window.size());

        renderer.draw_scene(&world, &meshes, &view, &proj);

        window.swap();
    }
}
