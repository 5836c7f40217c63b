use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use motion_coach::config::Config;
use motion_coach::logging::init_logger;
use motion_coach::pose::standing_frame;
use motion_coach::render::{Key, MinifbViewer};
use motion_coach::sequence::ReferenceSequence;
use motion_coach::session::{FrameSlot, MotionSession};
use nalgebra::{Rotation3, Vector3};

const CONFIG_PATH: &str = "motion_coach.toml";

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);
    init_logger(&config.log.level);

    println!("Skeleton Viewer ({})", env!("GIT_VERSION"));
    println!("Drag: rotate view, R: reset view, L: toggle live input, ESC: exit");

    let sequence = ReferenceSequence::new(vec![standing_frame()], config.session.fps)?;
    let mut session = MotionSession::new(&config, sequence);
    let orientation = session.orientation();

    let size = config.render.canvas_size as usize;
    let mut viewer = MinifbViewer::new("Skeleton Viewer", size, size)?;

    // デモ用のライブ入力: 立ち姿勢をゆっくり揺らして書き込み続ける
    let slot = FrameSlot::new();
    let live_enabled = Arc::new(AtomicBool::new(true));
    {
        let slot = slot.clone();
        let live_enabled = live_enabled.clone();
        let period = Duration::from_secs_f32(1.0 / config.session.fps.max(1.0));
        thread::spawn(move || {
            let start = Instant::now();
            loop {
                if live_enabled.load(Ordering::Acquire) {
                    let angle = (start.elapsed().as_secs_f32() * 0.8).sin() * 40.0;
                    let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), angle.to_radians());
                    let base = standing_frame();
                    let mut frame = base.clone();
                    for joint in 0..frame.landmarks.len() {
                        frame.set_position(joint, rotation * base.position(joint));
                    }
                    slot.publish(frame);
                }
                thread::sleep(period);
            }
        });
    }

    let mut last_id = 0;
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    while viewer.is_open() {
        if let Some((dx, dy)) = viewer.poll_drag() {
            orientation.apply_drag(dx, dy);
        }
        if viewer.key_pressed(Key::R) {
            orientation.reset();
        }
        if viewer.key_pressed(Key::L) {
            let enabled = !live_enabled.load(Ordering::Acquire);
            live_enabled.store(enabled, Ordering::Release);
            if !enabled {
                slot.clear();
                session.clear_colors();
            }
            println!("Live input: {}", if enabled { "on" } else { "off" });
        }

        if let Some((id, live)) = slot.take_newer(last_id) {
            last_id = id;
            let report = session.on_detection(&live);
            frame_count += 1;
            let elapsed = fps_timer.elapsed().as_secs_f32();
            if elapsed >= 1.0 {
                println!("Live FPS: {:.1}, score: {}", frame_count as f32 / elapsed, report.outcome);
                frame_count = 0;
                fps_timer = Instant::now();
            }
        }

        viewer.draw_canvas(&session.render());
        viewer.update()?;
    }

    println!("Shutting down...");
    Ok(())
}
