
fn main() {
    // only stamp version resources when actually targeting windows (cross or native)
    if std::env::var ("CARGO_CFG_TARGET_OS") .as_deref() == Ok("windows") {
        let res = winres::WindowsResource::new();
        if let Err(e) = res.compile() {
            println! ("cargo:warning=failed to embed windows resources: {e}");
        }
    }
}
