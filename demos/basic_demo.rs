//! Basic demonstration of the Ridgewalk simulation.
//!
//! Run with: cargo run --example basic_demo

use ridgewalk_sim::{
    GameLogic, GameLoop, InputState, LoopConfig, Simulation, Snapshot, WindowHost,
};

/// Headless window host: scripted input, closes after a fixed number of
/// frames.
struct ScriptedHost {
    frames_left: u32,
}

impl WindowHost for ScriptedHost {
    fn should_close(&self) -> bool {
        self.frames_left == 0
    }

    fn poll_input(&mut self) -> InputState {
        // Walk forward while slowly panning right.
        InputState {
            move_z: 1.0,
            mouse_dx: 1.5,
            rotate_held: true,
            ..Default::default()
        }
    }

    fn present(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
    }
}

fn main() {
    env_logger::init();

    println!("=== Ridgewalk - Simulation Demo ===\n");

    // Part 1: drive the simulation by hand, one fixed step at a time.
    let mut sim = Simulation::new_demo_world();
    let interval = 1.0 / 60.0;
    let input = InputState {
        move_z: 1.0,
        ..Default::default()
    };

    println!("Initial state:");
    print_snapshot(&sim.snapshot());

    println!("\nWalking forward for 300 ticks (5 seconds at 60 ticks/sec)...\n");
    sim.input(&input);
    for tick in 0..300 {
        sim.update(interval, &input).expect("demo update cannot fail");

        if (tick + 1) % 60 == 0 {
            println!(
                "--- Tick {} (t={:.1}s) ---",
                sim.current_tick(),
                sim.current_time()
            );
            print_snapshot(&sim.snapshot());
        }
    }

    // Part 2: the same scene under the real loop scheduler.
    println!("\nRunning the paced game loop for 120 frames at 60 fps...\n");
    let config = LoopConfig {
        target_ups: 60,
        target_fps: 60,
        vsync: false,
    };
    let host = ScriptedHost { frames_left: 120 };
    let mut game_loop = GameLoop::new(config, host, Simulation::new_demo_world());
    game_loop.run().expect("demo loop cannot fail");

    println!(
        "Loop finished: {} frames, {} fixed updates",
        game_loop.stats().frames(),
        game_loop.stats().updates()
    );
    game_loop.stats().print_summary();

    println!("=== Final State (JSON) ===\n");
    println!(
        "{}",
        game_loop
            .logic()
            .last_frame()
            .to_json_pretty()
            .unwrap_or_else(|_| "{}".to_string())
    );
}

fn print_snapshot(snapshot: &Snapshot) {
    let camera = &snapshot.camera;
    println!(
        "  Camera: pos=({:.2}, {:.2}, {:.2}) yaw={:.1} sun={:.1} deg",
        camera.position.x, camera.position.y, camera.position.z, camera.rotation.y, snapshot.sun_angle
    );
    for item in &snapshot.items {
        println!(
            "    Item {}: pos=({:.2}, {:.2}, {:.2})",
            item.id, item.x, item.y, item.z
        );
    }
}
