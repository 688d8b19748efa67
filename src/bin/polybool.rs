use std::process::ExitCode;

use polybool::{boolean_op, io, BooleanOp};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("usage: polybool subject-file clipping-file [I|U|D|X]");
        return ExitCode::from(1);
    }
    let op = match args.get(3).map(String::as_str) {
        None | Some("I") => BooleanOp::Intersection,
        Some("U") => BooleanOp::Union,
        Some("D") => BooleanOp::Difference,
        Some("X") => BooleanOp::Xor,
        Some(other) => {
            eprintln!("unknown operation {other:?}: expected I, U, D or X");
            return ExitCode::from(2);
        }
    };
    let subject = match io::read_polygon(&args[1]) {
        Ok(polygon) => polygon,
        Err(err) => {
            eprintln!("{}: {err}", args[1]);
            return ExitCode::from(3);
        }
    };
    let clipping = match io::read_polygon(&args[2]) {
        Ok(polygon) => polygon,
        Err(err) => {
            eprintln!("{}: {err}", args[2]);
            return ExitCode::from(3);
        }
    };
    match boolean_op(&subject, &clipping, op) {
        Ok(result) => {
            print!("{}", io::write_polygon(&result));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
