#![allow(dead_code)]

use mazequiz::config::GameConfig;
use mazequiz::session::GameSession;

/// Two phases, three questions, text-only answers.
pub fn sample_config() -> GameConfig {
    GameConfig::from_json(
        r#"{
            "phases": [
                {
                    "title": "warmup",
                    "questions": [
                        {
                            "prompt": "q1",
                            "answers": [
                                {"text": "right", "correct": true},
                                {"text": "wrong"}
                            ]
                        },
                        {
                            "prompt": "q2",
                            "answers": [
                                {"text": "right", "correct": true},
                                {"text": "wrong"}
                            ]
                        }
                    ]
                },
                {
                    "title": "finale",
                    "questions": [
                        {
                            "prompt": "q3",
                            "answers": [
                                {"text": "right", "correct": true},
                                {"text": "wrong"}
                            ]
                        }
                    ]
                }
            ]
        }"#,
    )
    .expect("sample config is valid")
}

/// One question whose answers carry image assets, for prefetch tests.
pub fn image_config() -> GameConfig {
    GameConfig::from_json(
        r#"{
            "phases": [
                {
                    "title": "pictures",
                    "questions": [
                        {
                            "prompt": "which?",
                            "answers": [
                                {"image": "a.png", "correct": true},
                                {"image": "b.png"}
                            ]
                        }
                    ]
                }
            ]
        }"#,
    )
    .expect("image config is valid")
}

pub fn sample_session(seed: u64) -> GameSession {
    GameSession::with_seed(sample_config(), seed).expect("session builds")
}
