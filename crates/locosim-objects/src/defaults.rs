//! Built-in object pack used when no external data is supplied.

pub const STEAM_RON: &str = r#"[
    (
        id: 0,
        name: "Steam puff",
        sprite_width: 20,
        sprite_height_negative: 24,
        sprite_height_positive: 8,
        num_stationary_ticks: 2,
        apply_wind: true,
        disperse_on_collision: true,
        frames: [
            (height: 0, image: 0), (height: 1, image: 1), (height: 1, image: 2), (height: 1, image: 3),
            (height: 1, image: 4), (height: 1, image: 5), (height: 1, image: 6), (height: 1, image: 7),
            (height: 1, image: 8), (height: 1, image: 9), (height: 1, image: 10), (height: 1, image: 11),
        ],
        alt_frames: [
            (height: 0, image: 12), (height: 2, image: 13), (height: 2, image: 14), (height: 2, image: 15),
            (height: 2, image: 16), (height: 2, image: 17),
        ],
    ),
    (
        id: 1,
        name: "Diesel exhaust",
        sprite_width: 12,
        sprite_height_negative: 16,
        sprite_height_positive: 4,
        num_stationary_ticks: 3,
        apply_wind: true,
        disperse_on_collision: false,
        frames: [
            (height: 0, image: 0), (height: 1, image: 1), (height: 1, image: 2), (height: 1, image: 3),
            (height: 1, image: 4), (height: 1, image: 5), (height: 1, image: 6), (height: 1, image: 7),
        ],
    ),
    (
        id: 2,
        name: "Electric spark",
        sprite_width: 8,
        sprite_height_negative: 8,
        sprite_height_positive: 8,
        num_stationary_ticks: 1,
        apply_wind: false,
        disperse_on_collision: false,
        frames: [(height: 0, image: 0), (height: 0, image: 1), (height: 0, image: 2), (height: 0, image: 3)],
    ),
]"#;

pub const VEHICLES_RON: &str = r#"[
    (
        id: 0,
        name: "Tank engine",
        body_sprites: [
            (flat_yaw_accuracy: 3, sloped_yaw_accuracy: 2, steep_sprites: false, sprite_width: 24),
        ],
    ),
    (
        id: 1,
        name: "Rack railcar",
        body_sprites: [
            (flat_yaw_accuracy: 4, sloped_yaw_accuracy: 3, steep_sprites: true, sprite_width: 28),
            (flat_yaw_accuracy: 2, sloped_yaw_accuracy: 1, steep_sprites: true, sprite_width: 16),
        ],
    ),
    (
        id: 2,
        name: "Freight wagon",
        body_sprites: [
            (flat_yaw_accuracy: 1, sloped_yaw_accuracy: 0, sprite_width: 20),
        ],
    ),
]"#;

pub const STATIONS_RON: &str = r#"[
    (id: 0, name: "Covered platform", exhaust_passes: false),
    (id: 1, name: "Open platform", exhaust_passes: true),
]"#;

pub const CONFIG_RON: &str = r#"(
    rotation: 0,
    vehicles_min_scale: Half,
    default_land_type: 0,
    title_mode: false,
)"#;
