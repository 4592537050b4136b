//! Build the parse tables and print automaton statistics.

use magpie_syntax::tables::{self, binary};

pub fn run(verify: bool) {
    let built = match tables::magpie() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("internal error: {e}");
            std::process::exit(2);
        }
    };

    println!("states:                  {}", built.state_count);
    println!("rules:                   {}", built.rule_count());
    println!("action cells:            {}", built.actions.len());
    println!("goto cells:              {}", built.gotos.len());
    println!("shift/reduce resolved:   {}", built.shift_reduce_resolved);
    println!("reduce/reduce resolved:  {}", built.reduce_reduce_resolved);

    if verify {
        let bytes = match binary::encode(built) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("encode failed: {e}");
                std::process::exit(2);
            }
        };
        match binary::decode(&bytes) {
            Ok(decoded) if decoded == *built => {
                println!("codec round trip:        ok ({} bytes)", bytes.len());
            }
            Ok(_) => {
                eprintln!("codec round trip: decoded tables differ");
                std::process::exit(2);
            }
            Err(e) => {
                eprintln!("decode failed: {e}");
                std::process::exit(2);
            }
        }
    }
}
