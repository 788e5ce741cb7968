use crate::pinning::ScreenPos;

const REASON: &str = "attaching windows to the desktop layer is only supported on Windows";

pub fn probe() -> Result<(), String> {
    Err(REASON.to_owned())
}

pub fn anchor(_title: &str, _pos: ScreenPos) -> Result<bool, String> {
    Err(REASON.to_owned())
}

pub fn move_to(_title: &str, _pos: ScreenPos) -> Result<(), String> {
    Err(REASON.to_owned())
}

pub fn release(_title: &str) {}
