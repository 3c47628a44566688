//! Skirmish headless driver
//!
//! Scatters a seeded demo scene, then feeds the simulation fixed steps from
//! a simulated 60 Hz frame clock and logs what collides.

use glam::{Affine2, Mat2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use skirmish::SimSettings;
use skirmish::sim::{Entity, World};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;

/// Despawn something every this many ticks
const CULL_INTERVAL: u64 = 10;

/// A moving demo body and the entity carrying its velocity
struct Body {
    entity: Entity,
    rate: Entity,
}

struct Driver {
    world: World,
    bodies: Vec<Body>,
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
}

impl Driver {
    fn new(settings: &SimSettings) -> skirmish::Result<Self> {
        let mut driver = Self {
            world: World::new(settings),
            bodies: Vec::new(),
            accumulator: 0.0,
            dt: settings.dt(),
            max_substeps: settings.max_substeps.max(1),
        };
        driver.populate(settings)?;
        Ok(driver)
    }

    /// Spawn the demo scene: drifting circles and rays, static triangles,
    /// and a square wall around the arena
    fn populate(&mut self, settings: &SimSettings) -> skirmish::Result<()> {
        let demo = &settings.demo;
        let extent = demo.arena_half_extent.max(1.0);
        let mut rng = Pcg32::seed_from_u64(demo.seed);
        let random_pos = |rng: &mut Pcg32| {
            Vec2::new(rng.random_range(-extent..extent), rng.random_range(-extent..extent))
        };

        for _ in 0..demo.circles {
            let pos = random_pos(&mut rng);
            let radius = rng.random_range(0.5..2.0);
            let vel = Vec2::new(rng.random_range(-4.0..4.0), rng.random_range(-4.0..4.0));
            let body = self.spawn_body(
                Affine2::from_scale_angle_translation(Vec2::splat(2.0 * radius), 0.0, pos),
                vel,
            )?;
            self.world.physics.add_circle(body.entity)?;
            self.world.hurt.track(body.entity)?;
            self.bodies.push(body);
        }

        for _ in 0..demo.triangles {
            let pos = random_pos(&mut rng);
            let u = Vec2::new(rng.random_range(1.0..4.0), 0.0);
            let v = Vec2::new(0.0, rng.random_range(1.0..4.0));
            let e = self.world.spawn();
            self.world.transforms.attach(e, Affine2::from_cols(u, v, pos))?;
            self.world.physics.add_triangle(e)?;
        }

        for _ in 0..demo.rays {
            let pos = random_pos(&mut rng);
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let length = rng.random_range(2.0..8.0);
            let vel = Vec2::new(rng.random_range(-8.0..8.0), rng.random_range(-8.0..8.0));
            let body = self.spawn_body(
                Affine2::from_angle_translation(angle, pos) * Affine2::from_scale(Vec2::splat(length)),
                vel,
            )?;
            self.world.physics.add_ray(body.entity)?;
            self.bodies.push(body);
        }

        let wall = self.world.spawn();
        self.world.physics.add_polygon_mesh(
            wall,
            vec![
                Vec2::new(-extent, -extent),
                Vec2::new(extent, -extent),
                Vec2::new(extent, extent),
                Vec2::new(-extent, extent),
            ],
        )?;

        log::info!(
            "Scene: {} circles, {} triangles, {} rays, 1 wall ({} entities)",
            demo.circles,
            demo.triangles,
            demo.rays,
            self.world.spawned()
        );
        Ok(())
    }

    /// Entity at `tfm`, integrated by a derivative entity moving at `vel`
    fn spawn_body(&mut self, tfm: Affine2, vel: Vec2) -> skirmish::Result<Body> {
        let entity = self.world.spawn();
        let rate = self.world.spawn();
        self.world.transforms.attach(entity, tfm)?;
        self.world
            .transforms
            .attach(rate, Affine2::from_mat2_translation(Mat2::ZERO, vel))?;
        self.world.deriv.derive_from(entity, rate)?;
        Ok(Body { entity, rate })
    }

    /// Advance by one display frame
    fn update(&mut self, frame_dt: f32) {
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            let report = self.world.tick(self.dt);
            self.accumulator -= self.dt;
            substeps += 1;

            if report.collision_pairs > 0 {
                log::debug!("tick {}: {} pairs", report.tick, report.collision_pairs);
            }
            if report.tick % CULL_INTERVAL == 0 {
                self.cull_first_hit();
            }
        }
    }

    /// Despawn the first body that is hurt this tick, along with its rate
    fn cull_first_hit(&mut self) {
        let hurt = self
            .bodies
            .iter()
            .position(|body| self.world.hurt.is_hurt(body.entity));
        if let Some(index) = hurt {
            let body = self.bodies.swap_remove(index);
            log::info!(
                "tick {}: culling {} ({} records this tick)",
                self.world.tick_count(),
                body.entity,
                self.world.physics.colliding_with(body.entity).count()
            );
            self.world.despawn(body.entity);
            self.world.despawn(body.rate);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Skirmish (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match SimSettings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => SimSettings::default(),
    };

    let mut driver = match Driver::new(&settings) {
        Ok(driver) => driver,
        Err(err) => {
            log::error!("Failed to build scene: {err}");
            std::process::exit(1);
        }
    };

    let target = u64::from(settings.demo.ticks);
    while driver.world.tick_count() < target {
        driver.update(FRAME_DT);
    }

    let hurt = driver
        .bodies
        .iter()
        .filter(|body| driver.world.hurt.is_hurt(body.entity))
        .count();
    log::info!(
        "Done after {} ticks: {} bodies left, {} hurt, {} collision records",
        driver.world.tick_count(),
        driver.bodies.len(),
        hurt,
        driver.world.collisions().len()
    );
}
