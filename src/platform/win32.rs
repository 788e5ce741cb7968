use crate::pinning::ScreenPos;
use log::{debug, warn};
use windows::core::{w, HSTRING, PCWSTR};
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, FindWindowExW, FindWindowW, GetWindowRect, SendMessageTimeoutW, SetParent,
    SetWindowPos, HWND_BOTTOM, SMTO_NORMAL, SWP_NOACTIVATE, SWP_NOSIZE, SWP_NOZORDER,
    SWP_SHOWWINDOW,
};

// Undocumented Progman message that makes Explorer spawn the WorkerW behind the icons.
const SPAWN_WORKERW: u32 = 0x052C;

pub fn probe() -> Result<(), String> {
    desktop_host()
        .map(|_| ())
        .ok_or_else(|| "Progman desktop window not found".to_owned())
}

// `Ok(false)` while the widget's window has not been created yet.
pub fn anchor(title: &str, pos: ScreenPos) -> Result<bool, String> {
    let Some(hwnd) = find_by_title(title) else {
        return Ok(false);
    };
    let host = desktop_host().ok_or_else(|| "desktop host window not found".to_owned())?;
    let (x, y) = to_host_coords(host, pos);
    unsafe {
        SetParent(hwnd, host).map_err(|err| format!("SetParent failed: {err}"))?;
        SetWindowPos(
            hwnd,
            HWND_BOTTOM,
            x,
            y,
            0,
            0,
            SWP_NOSIZE | SWP_NOACTIVATE | SWP_SHOWWINDOW,
        )
        .map_err(|err| format!("SetWindowPos failed: {err}"))?;
    }
    debug!("{title} parented to {host:?} at ({x}, {y})");
    Ok(true)
}

pub fn move_to(title: &str, pos: ScreenPos) -> Result<(), String> {
    let hwnd = find_by_title(title).ok_or_else(|| format!("window {title} not found"))?;
    let (x, y) = match desktop_host() {
        Some(host) => to_host_coords(host, pos),
        None => (pos.x, pos.y),
    };
    unsafe {
        SetWindowPos(
            hwnd,
            HWND::default(),
            x,
            y,
            0,
            0,
            SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
        )
        .map_err(|err| format!("SetWindowPos failed: {err}"))
    }
}

pub fn release(title: &str) {
    if let Some(hwnd) = find_by_title(title) {
        if let Err(err) = unsafe { SetParent(hwnd, HWND::default()) } {
            warn!("failed to unparent {title}: {err}");
        }
    }
}

fn find_by_title(title: &str) -> Option<HWND> {
    unsafe { FindWindowW(PCWSTR::null(), &HSTRING::from(title)).ok() }
}

fn to_host_coords(host: HWND, pos: ScreenPos) -> (i32, i32) {
    let mut rect = RECT::default();
    match unsafe { GetWindowRect(host, &mut rect) } {
        Ok(()) => (pos.x - rect.left, pos.y - rect.top),
        Err(_) => (pos.x, pos.y),
    }
}

fn desktop_host() -> Option<HWND> {
    unsafe {
        let progman = FindWindowW(w!("Progman"), PCWSTR::null()).ok()?;

        let mut spawn_result = 0usize;
        let _ = SendMessageTimeoutW(
            progman,
            SPAWN_WORKERW,
            WPARAM(0),
            LPARAM(0),
            SMTO_NORMAL,
            1000,
            Some(&mut spawn_result),
        );

        unsafe extern "system" fn find_defview_host(hwnd: HWND, lparam: LPARAM) -> BOOL {
            let found =
                FindWindowExW(hwnd, HWND::default(), w!("SHELLDLL_DefView"), PCWSTR::null());
            if found.is_ok() {
                if let Some(out) = (lparam.0 as *mut Option<HWND>).as_mut() {
                    *out = Some(hwnd);
                }
                return BOOL(0);
            }
            BOOL(1)
        }

        let mut defview_host: Option<HWND> = None;
        let _ = EnumWindows(
            Some(find_defview_host),
            LPARAM((&mut defview_host) as *mut Option<HWND> as isize),
        );

        if let Some(host) = defview_host {
            if let Ok(workerw) =
                FindWindowExW(HWND::default(), host, w!("WorkerW"), PCWSTR::null())
            {
                return Some(workerw);
            }
        }
        if let Ok(workerw) = FindWindowExW(progman, HWND::default(), w!("WorkerW"), PCWSTR::null())
        {
            return Some(workerw);
        }
        Some(progman)
    }
}
