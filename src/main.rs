use nalgebra::Vector6;

use ship_sim::io::csv;
use ship_sim::{simulate, ClarkeShip, ControlMode, ShipConfig, Vehicle};

fn main() {
    // -----------------------------------------------------------------------
    // Vehicle: 70 m single-screw ship, Clarke (1983) maneuvering model
    // -----------------------------------------------------------------------
    let cfg = ShipConfig {
        control_mode: ControlMode::HeadingAutopilot,
        psi_ref_deg: -80.0,
        length: 70.0,
        beam: 8.0,
        draft: 6.0,
        cb: 0.7,
        current_speed: 10.0,
        current_dir_deg: 0.0,
        current_enabled: true,
        service_speed: 28.0,
        delta_max_deg: 30.0,
        delta_rate_max_deg: 5.0,
    };

    let sample_time = 0.1; // s
    let t_sim = 1800.0; // s
    let n = (t_sim / sample_time) as usize;

    let mut ship = ClarkeShip::new(cfg).expect("invalid ship configuration");

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let out = simulate(n, sample_time, &mut ship, Vector6::zeros()).expect("simulation failed");

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let cfg = ship.config();
    println!();
    println!("====================================================================");
    println!("  MARINE CRAFT SIMULATION — {}", ship.name());
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Length:        {:>8.1} m     Beam:         {:>8.1} m",
        cfg.length, cfg.beam
    );
    println!(
        "  Draft:         {:>8.1} m     Cb:           {:>8.2}",
        cfg.draft, cfg.cb
    );
    println!(
        "  Displacement:  {:>8.0} t     Thrust:       {:>8.0} kN",
        ship.displacement() / 1000.0,
        ship.thrust() / 1000.0
    );
    println!(
        "  Service speed: {:>8.1} m/s   Current:      {:>8.1} m/s",
        cfg.service_speed, cfg.current_speed
    );
    println!(
        "  Rudder limit:  {:>8.1} deg   Rudder rate:  {:>8.1} deg/s",
        cfg.delta_max_deg, cfg.delta_rate_max_deg
    );
    println!();

    println!("  Heading Command");
    println!("  ──────────────────────────────────────────────────────────────────");
    let target = cfg.psi_ref_deg;
    let locked = out
        .time
        .iter()
        .zip((0..out.history.rows()).map(|i| out.history.yaw(i).to_degrees()))
        .find(|(_, psi)| (psi - target).abs() < 1.0);
    match locked {
        Some((t, _)) => println!("  Target {target:.0} deg, first within 1 deg at t={t:.1} s"),
        None => println!("  Target {target:.0} deg, never reached within 1 deg"),
    }
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>8}  {:>8}  {:>8}",
        "t (s)", "x (m)", "y (m)", "yaw(deg)", "U (m/s)", "rud(deg)"
    );
    println!("  {}", "─".repeat(60));

    let sample_interval = (out.history.rows() / 30).max(1);
    for i in (0..out.history.rows()).step_by(sample_interval) {
        let eta = out.history.eta(i);
        let nu = out.history.nu(i);
        let speed = nu[0].hypot(nu[1]);
        println!(
            "  {:>7.1}  {:>9.1}  {:>9.1}  {:>8.2}  {:>8.2}  {:>8.2}",
            out.time[i],
            eta[0],
            eta[1],
            eta[5].to_degrees(),
            speed,
            out.history.u_actual(i)[0].to_degrees()
        );
    }
    println!();

    if let Some(div) = out.divergence {
        println!(
            "  WARNING: run diverged at step {} (|state| = {:.3e})",
            div.step, div.value
        );
    }

    let last = out.history.rows() - 1;
    println!(
        "  Final heading: {:.2} deg after {:.0} s ({} samples, dt={} s)",
        out.history.yaw(last).to_degrees(),
        out.time[last],
        out.history.rows(),
        sample_time
    );

    let csv_path = "ship_trajectory.csv";
    match csv::write_history_file(csv_path, &out.time, &out.history) {
        Ok(()) => println!("  Trajectory written to {csv_path}"),
        Err(e) => eprintln!("  Could not write {csv_path}: {e}"),
    }
    println!("====================================================================");
    println!();
}
