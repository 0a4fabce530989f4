//! End-to-end rep counting: calibration, persistence and full sessions

use coach_web::exercise::{
    exercise_ids, CalibrationRecorder, CalibrationStore, ExerciseCalibration, ExerciseSession, FeedbackKey,
    FrameFeedback, MemoryStore, RepCounter, RepPhase,
};
use coach_web::pose::{
    Landmark, HAND_LANDMARK_COUNT, INDEX_DIP, INDEX_MCP, INDEX_PIP, LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, MIDDLE_DIP,
    MIDDLE_MCP, MIDDLE_PIP, POSE_LANDMARK_COUNT, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE,
};

const FPS: f64 = 30.0;

/// Standing pose with both knees bent to `knee_angle` degrees
fn pose(knee_angle: f32) -> Vec<Landmark> {
    let mut lm = vec![Landmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
    let theta = knee_angle.to_radians();
    for (hip, knee, ankle, x) in [(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, 0.45), (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, 0.55)] {
        lm[hip] = Landmark::new(x, 0.4);
        lm[knee] = Landmark::new(x, 0.6);
        lm[ankle] = Landmark::new(x + 0.2 * theta.sin(), 0.6 - 0.2 * theta.cos());
    }
    lm
}

/// Open hand with the index and middle PIP joints bent to `pip_angle` degrees
fn hand(pip_angle: f32) -> Vec<Landmark> {
    let mut lm = vec![Landmark::new(0.5, 0.7); HAND_LANDMARK_COUNT];
    let theta = pip_angle.to_radians();
    for (mcp, pip, dip, x) in [(INDEX_MCP, INDEX_PIP, INDEX_DIP, 0.45), (MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, 0.5)] {
        lm[mcp] = Landmark::new(x, 0.6);
        lm[pip] = Landmark::new(x, 0.5);
        lm[dip] = Landmark::new(x + 0.05 * theta.sin(), 0.5 + 0.05 * theta.cos());
    }
    lm
}

/// Six frames per angle so the stabilizer settles on each value
fn feed(session: &mut ExerciseSession, trace: &[f32], first_frame: usize) -> (Vec<FrameFeedback>, usize) {
    let mut frame = first_frame;
    let mut out = Vec::new();
    for &angle in trace {
        for _ in 0..6 {
            out.push(session.process_frame(&pose(angle), frame as f64 / FPS));
            frame += 1;
        }
    }
    (out, frame)
}

#[test]
fn reference_trace_counts_one_rep_on_return() {
    let mut counter = RepCounter::new(ExerciseCalibration::new(170.0, 90.0, 160.0));
    let trace = [170.0, 150.0, 120.0, 95.0, 90.0, 110.0, 140.0, 161.0, 170.0];

    let updates: Vec<_> = trace
        .iter()
        .enumerate()
        .map(|(i, &angle)| counter.update(angle, i as f64))
        .collect();

    let counted: Vec<usize> = updates
        .iter()
        .enumerate()
        .filter(|(_, u)| u.counted)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(counted, vec![7]);
    assert_eq!(counter.rep_count(), 1);
    assert_eq!(counter.phase(), RepPhase::WaitingForStart);

    // Full depth at a slow tempo
    let accuracy = updates[7].accuracy.unwrap();
    assert!(accuracy > 99.0, "accuracy {}", accuracy);
}

#[test]
fn shallow_rep_is_not_counted() {
    let mut counter = RepCounter::new(ExerciseCalibration::new(170.0, 90.0, 160.0));
    let trace = [170.0, 150.0, 130.0, 150.0, 165.0, 170.0];
    let mut feedback = Vec::new();
    for (i, &angle) in trace.iter().enumerate() {
        feedback.push(counter.update(angle, i as f64).feedback);
    }
    assert_eq!(counter.rep_count(), 0);
    assert!(feedback.contains(&FeedbackKey::NotDeepEnough));
}

#[test]
fn recorded_calibration_round_trips_through_store() {
    let mut recorder = CalibrationRecorder::new();
    for _ in 0..6 {
        recorder.record(170.0);
    }
    recorder.begin_reps();
    for angle in [170.0, 130.0, 95.0, 100.0, 150.0, 170.0] {
        recorder.record(angle);
    }
    let calibration = recorder.finish().unwrap();
    assert!((calibration.start_angle - 170.0).abs() < 1e-3);
    assert!((calibration.target_angle - 102.5).abs() < 1e-3);
    assert!((calibration.completion_threshold - 156.5).abs() < 1e-3);

    let mut store = CalibrationStore::new(MemoryStore::new());
    store.save("squat", &calibration).unwrap();
    let loaded = store.load("squat").unwrap().unwrap();
    assert_eq!(loaded, calibration);
    assert_eq!(store.load("lunge").unwrap(), None);

    let mut session = ExerciseSession::with_calibration("squat", loaded).unwrap();
    assert_eq!(session.calibration(), Some(calibration));

    // Recorded range is shallower than the default squat
    let (frames, _) = feed(&mut session, &[170.0, 150.0, 120.0, 100.0, 100.0, 130.0, 150.0, 170.0], 0);
    assert_eq!(frames.iter().filter(|f| f.counted).count(), 1);
    assert_eq!(session.rep_count(), 1);
}

#[test]
fn squat_set_summary() {
    let mut session = ExerciseSession::new("squat").unwrap();
    let rep = [170.0, 150.0, 120.0, 95.0, 90.0, 110.0, 140.0, 161.0, 170.0];
    let mut frame = 0;
    for _ in 0..3 {
        let (_, next) = feed(&mut session, &rep, frame);
        frame = next;
    }
    let summary = session.end_session();
    assert_eq!(summary.rep_count, 3);
    assert_eq!(summary.frames_processed, 3 * 9 * 6);
    assert!(summary.average_accuracy.unwrap() > 80.0);
    assert!(!session.is_active());

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["exerciseId"], "squat");
    assert_eq!(json["repCount"], 3);
}

#[test]
fn wall_sit_hold_counts_after_thirty_seconds() {
    let mut session = ExerciseSession::new("wall_sit").unwrap();
    let mut counted_at = None;
    let mut frame = 0usize;

    for _ in 0..30 {
        session.process_frame(&pose(170.0), frame as f64 / FPS);
        frame += 1;
    }
    for _ in 0..(33.0 * FPS) as usize {
        let t = frame as f64 / FPS;
        let fb = session.process_frame(&pose(90.0), t);
        if fb.counted && counted_at.is_none() {
            counted_at = Some(t);
        }
        frame += 1;
    }

    let t = counted_at.expect("hold was never completed");
    assert!((30.0..32.5).contains(&t), "completed at {}", t);
    assert_eq!(session.rep_count(), 1);
}

#[test]
fn finger_flexion_counts_a_curl_from_hand_frames() {
    let mut session = ExerciseSession::new("finger_flexion").unwrap();
    let curl = [175.0, 160.0, 130.0, 105.0, 100.0, 120.0, 150.0, 165.0, 175.0];
    let mut frame = 0usize;
    let mut counted = 0;
    for &angle in &curl {
        for _ in 0..6 {
            if session.process_frame(&hand(angle), frame as f64 / FPS).counted {
                counted += 1;
            }
            frame += 1;
        }
    }
    assert_eq!(counted, 1);
    assert_eq!(session.rep_count(), 1);

    let summary = session.end_session();
    assert_eq!(summary.frames_processed, (curl.len() * 6) as u64);
    assert!(summary.average_accuracy.unwrap() > 80.0);
}

#[test]
fn grip_squeeze_holds_for_three_seconds() {
    let mut session = ExerciseSession::new("grip_squeeze").unwrap();
    let mut frame = 0usize;
    for _ in 0..FPS as usize {
        session.process_frame(&hand(170.0), frame as f64 / FPS);
        frame += 1;
    }

    let squeeze_start = frame as f64 / FPS;
    let mut counted_at = None;
    for _ in 0..(5.0 * FPS) as usize {
        let t = frame as f64 / FPS;
        if session.process_frame(&hand(90.0), t).counted && counted_at.is_none() {
            counted_at = Some(t - squeeze_start);
        }
        frame += 1;
    }

    let held = counted_at.expect("squeeze was never completed");
    assert!((3.0..3.6).contains(&held), "completed after {}", held);
    assert_eq!(session.rep_count(), 1);
}

#[test]
fn every_catalog_exercise_starts_a_session() {
    for id in exercise_ids() {
        let mut session = ExerciseSession::new(id).unwrap();
        assert_eq!(session.exercise_id(), id);
        assert_eq!(session.end_session().rep_count, 0);
    }
}
