use avian3d::prelude::*;
use bevy::app::ScheduleRunnerPlugin;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_step_hooks::prelude::*;
use std::time::Duration;

fn main() {
    println!("Starting headless prediction check...");
    println!("Compares each predicted velocity with what avian produced after the step.");

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))))
        .add_plugins(AssetPlugin::default())
        .add_plugins(TransformPlugin)
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(VelocityPredictionPlugin)
        .add_plugins(PostPhysicsCallbackPlugin)
        .insert_resource(Time::<Fixed>::from_hz(50.0))
        .add_systems(Startup, setup_simulation)
        .add_systems(FixedUpdate, push_bodies.before(VelocityPredictionSystems))
        .add_systems(Update, quit_after_timeout)
        .run();
}

#[derive(Component)]
struct Thruster(Vec3);

fn setup_simulation(mut commands: Commands) {
    println!("\n[SETUP] Spawning test bodies...");

    commands.spawn((
        Name::new("Free fall"),
        RigidBody::Dynamic,
        Collider::sphere(0.5),
        Transform::from_xyz(0.0, 50.0, 0.0),
        PredictVelocity,
    ));

    commands.spawn((
        Name::new("Thruster, no gravity"),
        RigidBody::Dynamic,
        Collider::sphere(0.5),
        Transform::from_xyz(5.0, 50.0, 0.0),
        GravityScale(0.0),
        AccumulatedForce::default(),
        Thruster(Vec3::new(10.0, 0.0, 0.0)),
        PredictVelocity,
    ));

    commands.spawn((
        Name::new("Damped thruster"),
        RigidBody::Dynamic,
        Collider::sphere(0.5),
        Transform::from_xyz(10.0, 50.0, 0.0),
        LinearDamping(2.0),
        AccumulatedForce::default(),
        Thruster(Vec3::new(0.0, 0.0, 25.0)),
        PredictVelocity,
    ));

    // The referee's lifetime bounds the comparison callback.
    let referee = commands.spawn(Name::new("Referee")).id();
    commands.add_post_physics_callback(referee, compare_with_prediction);
}

fn push_bodies(mut bodies: Query<(&Thruster, &mut AccumulatedForce)>) {
    for (thruster, mut force) in bodies.iter_mut() {
        force.add(thruster.0);
    }
}

fn compare_with_prediction(
    registry: Res<PostPhysicsCallbacks>,
    bodies: Query<(&Name, &LinearVelocity, &PredictedVelocity)>,
) {
    if registry.ticks() % 50 != 0 {
        return;
    }

    for (name, velocity, predicted) in bodies.iter() {
        let error = (velocity.0 - predicted.0).length();
        println!(
            "[STEP {}] {}: actual {:.4?} predicted {:.4?} error {:.6}",
            registry.ticks(),
            name,
            velocity.0,
            predicted.0,
            error
        );
    }
}

fn quit_after_timeout(time: Res<Time>, mut exit: MessageWriter<AppExit>) {
    if time.elapsed_secs() > 3.0 {
        println!("[FINISHED] Simulation complete.");
        exit.write(AppExit::Success);
    }
}
