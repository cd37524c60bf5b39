use std::io::Write;

use crate::error::Result;
use crate::workshop::{State, Substep};

/// Print the state as plain text, for terminals without the full UI.
pub fn print_state<W: Write>(out: &mut W, st: &State) -> Result<()> {
    write!(out, "\n\n")?;
    writeln!(
        out,
        ".... {} (Step {} of {}) ....",
        st.state_name.friendly_name(),
        st.step_num,
        st.total_steps
    )?;
    writeln!(out, "{}", st.description)?;

    writeln!(out, "Complete the following steps to advance:")?;
    for substep in &st.substeps {
        print_substep(out, substep)?;
    }

    writeln!(out, "^^^^ ^^^^")?;
    Ok(())
}

pub fn print_substep<W: Write>(out: &mut W, substep: &Substep) -> Result<()> {
    let marker = if substep.done { "Ch " } else { "X  " };

    if substep.instruction.is_empty() {
        writeln!(out, "  {} - {:<24}", marker, substep.desc)?;
    } else if substep.output.is_empty() {
        writeln!(out, "  {} - {:<24} ({:>20})", marker, substep.desc, substep.instruction)?;
    } else {
        writeln!(
            out,
            "  {} - {:<24} ({:>20}) -> {:?}",
            marker, substep.desc, substep.instruction, substep.output
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workshop::StateName;

    fn render(st: &State) -> String {
        let mut out = Vec::new();
        print_state(&mut out, st).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_header_substeps_and_footer() {
        let st = State {
            state_name: StateName::WaitForReady,
            step_num: 1,
            total_steps: 3,
            description: "Get Pixeltilt up and running.".to_string(),
            substeps: vec![
                Substep::new("resource muxer", "tilt get uiresource -o json muxer").passed(),
                Substep::new("muxer ready", "curl http://localhost:8080").failed("Error: refused"),
                Substep::new("Click Next", ""),
            ],
            ..State::default()
        };

        let text = render(&st);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], ".... Start Pixeltilt (Step 1 of 3) ....");
        assert_eq!(lines[3], "Get Pixeltilt up and running.");
        assert_eq!(lines[4], "Complete the following steps to advance:");
        assert!(lines[5].starts_with("  Ch  - resource muxer"));
        assert!(lines[5].ends_with("(tilt get uiresource -o json muxer)"));
        assert!(lines[6].starts_with("  X   - muxer ready"));
        assert!(lines[6].ends_with(r#"-> "Error: refused""#));
        assert_eq!(lines[7].trim_end(), "  X   - Click Next");
        assert_eq!(lines[8], "^^^^ ^^^^");
    }

    #[test]
    fn short_instructions_are_right_aligned() {
        let mut out = Vec::new();
        print_substep(&mut out, &Substep::new("check", "ls")).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.contains(&format!("({:>20})", "ls")));
    }
}
