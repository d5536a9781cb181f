//! End-to-end sandbox scenarios, run headless and silent

use approx::assert_relative_eq;
use glam::Quat;
use tumble_audio::{CueLog, MutedCue, RecordingCue};
use tumble_physics::CollisionEvent;
use tumble_render::{HeadlessRenderer, Viewport};
use tumble_sandbox::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn config() -> SandboxConfig {
    SandboxConfig {
        seed: Some(1234),
        initial_objects: Vec::new(),
        ..Default::default()
    }
}

fn session() -> Session {
    Session::initialize(&config(), Box::new(MutedCue::new()))
}

fn recording_session(sound: bool) -> (Session, CueLog) {
    let (cue, log) = RecordingCue::new();
    let mut config = config();
    config.sound.enabled = sound;
    (Session::initialize(&config, Box::new(cue)), log)
}

fn frame(session: &mut Session) {
    session.step(DT);
    session.sync().unwrap();
}

#[test]
fn test_pairing_invariant() {
    let mut session = session();
    session.spawn_initial_objects(&SandboxConfig::default().initial_objects).unwrap();
    session.create_random(ShapeKind::Cylinder).unwrap();

    let registry = session.registry();
    assert_eq!(registry.len(), 3);
    // Floor body and mesh plus one of each per record.
    assert_eq!(session.physics().body_count(), registry.len() + 1);
    assert_eq!(session.scene().len(), registry.len() + 1);

    for record in registry.iter() {
        assert!(session.physics().contains_body(record.body));
        assert!(session.scene().contains(record.mesh));
    }
}

#[test]
fn test_create_three_then_reset() {
    let mut session = session();
    session.create_random(ShapeKind::Sphere).unwrap();
    session.create_random(ShapeKind::Box).unwrap();
    session.create_random(ShapeKind::Cylinder).unwrap();
    for _ in 0..30 {
        frame(&mut session);
    }

    let records: Vec<ObjectRecord> = session.registry().records().to_vec();
    assert_eq!(session.reset(), 3);

    assert!(session.registry().is_empty());
    assert_eq!(session.physics().body_count(), 1);
    assert_eq!(session.scene().len(), 1);
    assert_eq!(session.physics().subscription_count(), 0);
    for record in &records {
        assert!(!session.physics().contains_body(record.body));
        assert!(!session.scene().contains(record.mesh));
    }

    let floor = session.floor();
    assert!(session.physics().contains_body(floor.body));
    assert!(session.scene().contains(floor.mesh));

    // The world keeps running after a reset.
    frame(&mut session);
    session.create_random(ShapeKind::Box).unwrap();
    frame(&mut session);
    assert_eq!(session.registry().len(), 1);
}

#[test]
fn test_sync_is_bit_exact() {
    let mut session = session();
    let block = ShapeSpec::Box {
        width: 1.0,
        height: 1.5,
        depth: 2.0,
    };
    session.create(block, [0.2, 3.0, -0.4]).unwrap();
    session.create_random(ShapeKind::Cylinder).unwrap();

    for _ in 0..90 {
        frame(&mut session);
        for record in session.registry().iter() {
            let pose = session.physics().get_body_pose(record.body).unwrap();
            let mesh = session.scene().get(record.mesh).unwrap();
            assert_eq!(mesh.transform.position.to_array(), pose.position);
            assert_eq!(mesh.transform.rotation.to_array(), pose.rotation);
        }
    }
}

#[test]
fn test_plank_tips_off_ball_and_mesh_follows() {
    let mut session = session();
    session.create(ShapeSpec::Sphere { radius: 0.5 }, [0.0, 0.5, 0.0]).unwrap();
    let plank = ShapeSpec::Box {
        width: 2.0,
        height: 0.1,
        depth: 0.5,
    };
    let record = session.create(plank, [0.8, 2.0, 0.0]).unwrap();

    let mut max_tilt = 0.0f32;
    for _ in 0..240 {
        frame(&mut session);
        let pose = session.physics().get_body_pose(record.body).unwrap();
        let mesh = session.scene().get(record.mesh).unwrap();
        assert_eq!(mesh.transform.rotation.to_array(), pose.rotation);
        max_tilt = max_tilt.max(mesh.transform.rotation.angle_between(Quat::IDENTITY));
    }

    // Landing off-centre on the ball must rotate the plank.
    assert!(max_tilt > 0.1, "plank never tilted, max angle {}", max_tilt);
}

#[test]
fn test_sync_leaves_scale_alone() {
    let mut session = session();
    let record = session
        .create(ShapeSpec::Cylinder { radius: 0.3, height: 1.2 }, [0.0, 3.0, 0.0])
        .unwrap();
    for _ in 0..60 {
        frame(&mut session);
    }
    let mesh = session.scene().get(record.mesh).unwrap();
    assert_eq!(mesh.transform.scale.to_array(), [0.3, 1.2, 0.3]);
}

#[test]
fn test_fall_is_monotonic_until_contact() {
    let mut session = session();
    let record = session.create(ShapeSpec::Sphere { radius: 0.5 }, [0.0, 3.0, 0.0]).unwrap();

    let mut last_y = session.physics().get_body_position(record.body).unwrap()[1];
    for _ in 0..120 {
        frame(&mut session);
        if !session.physics().collision_events().is_empty() {
            break;
        }
        let y = session.physics().get_body_position(record.body).unwrap()[1];
        assert!(y <= last_y, "height rose from {} to {} before contact", last_y, y);
        last_y = y;
    }
    assert!(last_y < 3.0);
}

#[test]
fn test_sphere_settles_on_floor() {
    let mut session = session();
    let record = session.create(ShapeSpec::Sphere { radius: 0.5 }, [0.0, 3.0, 0.0]).unwrap();

    for _ in 0..300 {
        frame(&mut session);
    }

    let [x, y, z] = session.physics().get_body_position(record.body).unwrap();
    assert_relative_eq!(y, 0.5, epsilon = 0.05);
    assert_relative_eq!(x, 0.0, epsilon = 1e-3);
    assert_relative_eq!(z, 0.0, epsilon = 1e-3);

    let mesh = session.scene().get(record.mesh).unwrap();
    assert_eq!(mesh.transform.position.y, y);
}

#[test]
fn test_sound_disabled_never_plays() {
    let (mut session, log) = recording_session(false);
    session.create(ShapeSpec::Sphere { radius: 0.5 }, [0.0, 3.0, 0.0]).unwrap();
    for _ in 0..240 {
        frame(&mut session);
    }
    assert!(log.is_empty());
    assert_eq!(session.hit_sound().play_count(), 0);
}

#[test]
fn test_sound_plays_once_per_hard_impact() {
    let (mut session, log) = recording_session(true);
    let record = session.create(ShapeSpec::Sphere { radius: 0.5 }, [0.0, 3.0, 0.0]).unwrap();

    let is_loud = |e: &CollisionEvent| {
        e.is_started() && e.involves(record.body) && e.impact_velocity > DEFAULT_IMPACT_THRESHOLD
    };

    let mut loud = 0;
    for _ in 0..240 {
        frame(&mut session);
        loud += session.physics().collision_events().iter().filter(|e| is_loud(e)).count();
    }

    assert!(loud >= 1, "a drop from 3 m must hit hard at least once");
    assert_eq!(log.len(), loud);
    assert!(log.plays().iter().all(|p| p.position == 0.0 && (0.0..1.0).contains(&p.volume)));
}

#[test]
fn test_reset_unhooks_sound() {
    let (mut session, log) = recording_session(true);
    session.create(ShapeSpec::Sphere { radius: 0.5 }, [0.0, 3.0, 0.0]).unwrap();
    frame(&mut session);
    session.reset();
    for _ in 0..120 {
        frame(&mut session);
    }
    assert!(log.is_empty());
}

#[test]
fn test_first_frame_takes_one_step() {
    let mut session = session();
    assert_eq!(session.step(0.0), 1);
    assert_eq!(session.step(DT), 1);
    // A long stall is capped at three steps.
    assert_eq!(session.step(0.5), 3);
}

#[test]
fn test_frame_loop_runs_to_frame_limit() {
    let mut config = config();
    config.display.max_frames = Some(5);
    config.display.target_fps = 0;

    let mut session = Session::initialize(&config, Box::new(MutedCue::new()));
    session.create_random(ShapeKind::Sphere).unwrap();

    let renderer = HeadlessRenderer::new(Viewport::default());
    let mut frame_loop = FrameLoop::from_config(session, &config, renderer);
    assert_eq!(frame_loop.run().unwrap(), LoopExit::FrameLimit);
    assert_eq!(frame_loop.frame_count(), 5);
    assert_eq!(frame_loop.renderer().frame_count(), 5);
    assert_eq!(frame_loop.renderer().last_frame().meshes, 2);
}

#[test]
fn test_commands_apply_between_frames() {
    let config = config();
    let session = Session::initialize(&config, Box::new(MutedCue::new()));
    let (sender, receiver) = crossbeam_channel::unbounded();

    let mut frame_loop = FrameLoop::from_config(session, &config, HeadlessRenderer::default())
        .with_commands(receiver)
        .with_target_fps(0);

    sender.send(ControlCommand::Spawn(ShapeKind::Sphere)).unwrap();
    sender.send(ControlCommand::Spawn(ShapeKind::Box)).unwrap();
    assert_eq!(frame_loop.tick().unwrap(), None);
    assert_eq!(frame_loop.session().registry().len(), 2);

    sender.send(ControlCommand::Reset).unwrap();
    sender.send(ControlCommand::Sound(SoundSwitch::On)).unwrap();
    assert_eq!(frame_loop.tick().unwrap(), None);
    assert!(frame_loop.session().registry().is_empty());
    assert!(frame_loop.session().sound_enabled());

    sender.send(ControlCommand::Quit).unwrap();
    assert_eq!(frame_loop.run().unwrap(), LoopExit::Quit);
}

#[test]
fn test_cancelled_loop_stops_immediately() {
    let config = config();
    let session = Session::initialize(&config, Box::new(MutedCue::new()));
    let token = CancellationToken::new();
    token.cancel();

    let mut frame_loop = FrameLoop::from_config(session, &config, HeadlessRenderer::default())
        .with_cancellation(token)
        .with_max_frames(None);
    assert_eq!(frame_loop.run().unwrap(), LoopExit::Cancelled);
    assert_eq!(frame_loop.frame_count(), 0);
}

#[test]
fn test_resize_clamps_pixel_ratio() {
    let config = config();
    let session = Session::initialize(&config, Box::new(MutedCue::new()));
    let mut frame_loop = FrameLoop::from_config(session, &config, HeadlessRenderer::default());

    frame_loop.resize(1000, 500, 3.0);
    assert_eq!(frame_loop.viewport().pixel_ratio(), 2.0);
    assert_eq!(frame_loop.renderer().viewport().physical_size(), (2000, 1000));
    assert_relative_eq!(frame_loop.camera().aspect, 2.0);
}
