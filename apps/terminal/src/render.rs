use std::fmt::Write as _;

use client_core::{FlowController, QuizChoice, Screen};

const LETTER: &str = "\
Wowwwww halo cikal, as usual apa kabarr? Semoga kabarmu baik ya, sehat2 deh.
Selamat ulang tahun ke 20 tahun kall, semoga di setiap jalan kmu diiringin ama
orang2 yang baik, bahagia terus, dan makin banyak hal2 baik terjadi di hidupmu.
Semoga yang kamu semogakan tersemogakan, happy birthday! :3

                                             TTD Anisah Octa_IF'23 🥳";

pub fn screen(flow: &FlowController) -> String {
    let mut out = String::new();
    match flow.screen() {
        Screen::Quiz => {
            out.push_str("you can only choose one 😱⁉️\n");
            for (index, choice) in QuizChoice::ALL.into_iter().enumerate() {
                let _ = write!(out, "  [{}] {}", index + 1, choice.emoji());
            }
            out.push_str("\nmang eak ada kau disini kal\n> ");
        }
        Screen::Error => {
            out.push_str("TETOTTT SALAH\nhehe nt, ngak papa coba lagi saja 😏\n[enter] Coba lagi awowkaok");
        }
        Screen::Success => {
            out.push_str("WOWWW BENARR!!\nyhh karna benar kmu dapat ke next quest 🥱\n[enter] Lanjut pliz");
        }
        Screen::Envelope => {
            out.push_str("Eummm ini surat apedah, emang hari ini hari apa yak? 🤔\n[enter] Klik amplop ini agar muncul jumpscare");
        }
        Screen::Letter => {
            out.push_str("Happy Birthday Cikallll\n\n");
            out.push_str(LETTER);
            out.push_str("\n\n[enter] Next lagi plsss");
        }
        Screen::Fairy => {
            out.push_str("Sekarang kamu bertemu dengan ibu peri Anisa Octa 😏\n");
            out.push_str("Tuliskan permintaanmu di sini yh kal\n");
            push_validation(&mut out, flow);
            out.push_str("> ");
        }
        Screen::Grade if flow.popup_visible() => {
            out.push_str("Good job calon hengker internasional 😏 makasih udah ngisi index, semoga IP mu sem ini menaik yaa, berapapun ituu\n[enter] Last slidee gass");
        }
        Screen::Grade => {
            out.push_str("Harapan IP di sem 5 🤓☝️\n");
            for (index, row) in flow.rows().iter().enumerate() {
                let grade = row.grade.map_or("-", |grade| grade.as_str());
                let _ = writeln!(
                    out,
                    "  {:>2}. {:<40} {:>3} sks  {}",
                    index + 1,
                    row.course.name,
                    row.course.sks,
                    grade
                );
            }
            push_validation(&mut out, flow);
            out.push_str("ketik `<no> <nilai>` (mis. `1 AB`), atau `kirim`\n> ");
        }
        Screen::Cake => {
            out.push_str("Sekarang tiup lilinnya tiup lilinnya tiup lilinnya sekarang juga 🎂🥳\n[enter] tiup lilin");
        }
        Screen::Final => {
            out.push_str("Jangan lupa minum air putih 🤗🥛\nadios 🙂‍↔️");
        }
    }
    out
}

/// Line shown while a reveal timer or a write is outstanding.
pub fn waiting(flow: &FlowController) -> Option<&'static str> {
    if flow.pending_timer().is_some() {
        return match flow.screen() {
            Screen::Envelope => Some("wait yak loadink..."),
            Screen::Cake => Some("YEYYYY! 🎉 Selamat ultahh sekali lagi kal"),
            _ => None,
        };
    }
    if flow.submission_in_flight() {
        return match flow.screen() {
            Screen::Fairy => Some("Loading lalala..."),
            Screen::Grade => Some("Submitting..."),
            _ => None,
        };
    }
    None
}

fn push_validation(out: &mut String, flow: &FlowController) {
    if let Some(message) = flow.validation_message() {
        let _ = writeln!(out, "! {message}");
    }
}
