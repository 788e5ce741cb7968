use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=ico/app.ico");

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    let Some(icon_path) = ["ico/app.ico"].into_iter().find(|p| Path::new(p).is_file()) else {
        println!("cargo:warning=No icon found at ico/app.ico; exe icon resource not set");
        return;
    };

    let mut res = winres::WindowsResource::new();
    res.set_icon(icon_path);
    res.set("ProductName", "Desktop Widget Manager");
    res.set("FileDescription", "Desktop Widget Manager");
    res.set("OriginalFilename", "desk_widgets.exe");
    res.set("InternalName", "desk_widgets");
    if let Err(err) = res.compile() {
        panic!("failed to compile Windows resource icon from {icon_path}: {err}");
    }
}
