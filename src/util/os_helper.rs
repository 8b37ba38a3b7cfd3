/// The OS user's real name, or the login name when no real name is set.
pub fn default_author() -> String {
    let name = whoami::realname();
    if name.trim().is_empty() {
        return whoami::username();
    }
    name
}
