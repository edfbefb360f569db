use assert_cmd::Command;

pub fn eqref_cmd() -> Command {
    let mut cmd = Command::cargo_bin("eqref").unwrap();
    cmd.env_remove("EQREF_ROOT");
    cmd
}
