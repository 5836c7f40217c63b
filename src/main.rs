use anyhow::Result;
use motion_coach::config::Config;
use motion_coach::logging::init_logger;
use motion_coach::pose::{standing_frame, BoneVectors, LandmarkFrame};
use motion_coach::retarget::retarget;
use motion_coach::sequence::ReferenceSequence;
use motion_coach::session::MotionSession;
use motion_coach::similarity::SimilarityScorer;
use nalgebra::{Rotation3, Vector3};
use std::io::{self, Write};

const CONFIG_PATH: &str = "motion_coach.toml";

/// 立ち姿勢を画面奥行き方向 (Z) まわりに回したもの
fn turned(frame: &LandmarkFrame, degrees: f32) -> LandmarkFrame {
    let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.to_radians());
    let mut out = frame.clone();
    for joint in 0..out.landmarks.len() {
        out.set_position(joint, rotation * frame.position(joint));
    }
    out
}

/// 右腕を肩の高さまで上げた手本フレーム
fn arm_raised() -> LandmarkFrame {
    let mut frame = standing_frame();
    let shoulder = frame.position(12);
    for (joint, reach) in [(14, 0.12), (16, 0.23), (18, 0.26), (20, 0.26), (22, 0.24)] {
        let p = frame.position(joint);
        frame.set_position(joint, Vector3::new(shoulder.x - reach, shoulder.y, p.z));
    }
    frame
}

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);
    init_logger(&config.log.level);

    let sequence = ReferenceSequence::new(vec![standing_frame(), arm_raised()], config.session.fps)?;
    let mut session = MotionSession::new(&config, sequence);
    let orientation = session.orientation();

    println!("=== Motion Coach ({}) ===", env!("GIT_VERSION"));
    println!("基準フレーム: {} 枚 @ {} fps", session.sequence().len(), session.sequence().fps());
    println!();
    println!("コマンド:");
    println!("  d dx dy       - 視点をドラッグ (例: d 20 -10)");
    println!("  r             - 視点をリセット");
    println!("  v             - 現在の視線ベクトルを表示");
    println!("  n             - 次の基準フレームへ");
    println!("  s deg         - 立ち姿勢を deg 度回して採点 (例: s 37)");
    println!("  t deg         - 回した姿勢を基準フレームの骨格でリターゲットして採点");
    println!("  p             - 現在の視点で描画して画素数を表示");
    println!("  q             - 終了");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "d" if parts.len() == 3 => {
                let dx: f32 = parts[1].parse()?;
                let dy: f32 = parts[2].parse()?;
                orientation.apply_drag(dx, dy);
                println!("視線: {:?}", orientation.view_normal().as_slice());
            }
            "r" => {
                orientation.reset();
                println!("視点をリセットしました");
            }
            "v" => {
                println!("視線: {:?}", orientation.view_normal().as_slice());
            }
            "n" => {
                session.advance();
                println!("基準フレーム: {}", session.reference_index());
            }
            "s" if parts.len() == 2 => {
                let degrees: f32 = parts[1].parse()?;
                let report = session.on_detection(&turned(&standing_frame(), degrees));
                println!("スコア: {}", report.outcome);
                if let Some(hint) = report.hint {
                    println!("{}", hint);
                }
            }
            "t" if parts.len() == 2 => {
                let degrees: f32 = parts[1].parse()?;
                let live = turned(&standing_frame(), degrees);
                let reference = session.reference_frame().clone();
                let retargeted = retarget(&live, &reference, 1.0)?;
                let scorer = SimilarityScorer::from_config(&config.scoring);
                let before = scorer.outcome(&BoneVectors::from_frame(&reference), &BoneVectors::from_frame(&live));
                let after =
                    scorer.outcome(&BoneVectors::from_frame(&reference), &BoneVectors::from_frame(&retargeted));
                println!("リターゲット前: {}  後: {}", before, after);
            }
            "p" => {
                let canvas = session.render();
                let painted = canvas.pixels().iter().filter(|p| p[3] != 0).count();
                println!("{}x{} 描画画素: {}", canvas.width(), canvas.height(), painted);
            }
            "q" => {
                println!("終了します");
                break;
            }
            _ => {
                println!("不明なコマンド: {}", parts[0]);
            }
        }
    }

    Ok(())
}
