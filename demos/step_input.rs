use nalgebra::Vector6;

use ship_sim::{simulate, ClarkeShip, ControlMode, ShipConfig};

/// Open-loop turning run: hold a 10 deg rudder step, then release it and
/// watch the hull straighten out.
fn main() {
    let cfg = ShipConfig {
        control_mode: ControlMode::StepInput,
        service_speed: 12.0,
        ..ShipConfig::default()
    };

    let mut ship = ClarkeShip::new(cfg).expect("invalid ship configuration");
    let dt = 0.1;
    let n = 6000; // 600 s

    let out = simulate(n, dt, &mut ship, Vector6::zeros()).expect("simulation failed");

    println!("Turning test, rudder step 10 deg ({} samples)", out.history.rows());
    println!(
        "{:>7}  {:>9}  {:>9}  {:>9}  {:>9}",
        "t (s)", "x (m)", "y (m)", "yaw(deg)", "r(deg/s)"
    );
    for i in (0..out.history.rows()).step_by(500) {
        let eta = out.history.eta(i);
        let nu = out.history.nu(i);
        println!(
            "{:>7.0}  {:>9.1}  {:>9.1}  {:>9.1}  {:>9.3}",
            out.time[i],
            eta[0],
            eta[1],
            eta[5].to_degrees(),
            nu[5].to_degrees()
        );
    }

    let peak_rate = (0..out.history.rows())
        .map(|i| out.history.nu(i)[5].abs())
        .fold(0.0_f64, f64::max);
    println!("Peak yaw rate: {:.3} deg/s", peak_rate.to_degrees());
}
