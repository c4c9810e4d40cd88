use std::io::{self, Write};

use crate::sim::recorder::History;

/// Write a simulation run to CSV format.
///
/// Columns: time, x, y, z, roll, pitch, yaw, u, v, w, p, q, r, then one
/// `u_cmd_<i>` and one `u_act_<i>` column per actuator channel, in the
/// same order as the history table itself.
pub fn write_history<W: Write>(writer: &mut W, time: &[f64], history: &History) -> io::Result<()> {
    write!(writer, "time,x,y,z,roll,pitch,yaw,u,v,w,p,q,r")?;
    for j in 0..history.dim_u() {
        write!(writer, ",u_cmd_{j}")?;
    }
    for j in 0..history.dim_u() {
        write!(writer, ",u_act_{j}")?;
    }
    writeln!(writer)?;

    for (i, t) in time.iter().enumerate() {
        write!(writer, "{:.4}", t)?;
        for v in history.row(i) {
            write!(writer, ",{:.6}", v)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write a simulation run to a CSV file at the given path.
pub fn write_history_file(path: &str, time: &[f64], history: &History) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_history(&mut file, time, history)
}
