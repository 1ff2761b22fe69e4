/// Author name for new posts: the OS user's real name, or the login name when unset.
pub fn get_name() -> String {
    let name = whoami::realname();
    if name.trim().is_empty() {
        return whoami::username();
    }
    name
}
