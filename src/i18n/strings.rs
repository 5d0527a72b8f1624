use once_cell::sync::Lazy;
use std::collections::HashMap;

/// key -> (tr, en)
static STRINGS: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    let entries: &[(&str, &str, &str)] = &[
        // Sidebar sections
        ("nav.section.general", "Genel", "General"),
        ("nav.section.school", "Okulumuz", "Our School"),
        ("nav.section.admissions", "Başvurular", "Admissions"),
        ("nav.section.students", "Öğrenci İşleri", "Student Affairs"),
        ("nav.section.communication", "İletişim", "Communication"),
        ("nav.section.management", "Yönetim", "Management"),
        ("nav.section.family", "Ailem", "My Family"),
        // Tabs
        ("tab.home", "Ana Sayfa", "Home"),
        ("tab.about", "Ref Akademi", "Ref Academy"),
        ("tab.contact", "İletişim", "Contact"),
        ("tab.inquiry", "Ön Kayıt Formu", "Inquiry Form"),
        ("tab.teacher_application", "Referans Öğretmen Başvurusu", "Reference Teacher Application"),
        ("tab.login", "Giriş Yap", "Sign In"),
        ("tab.dashboard", "Panel", "Dashboard"),
        ("tab.users", "Kullanıcılar", "Users"),
        ("tab.children", "Öğrenciler", "Children"),
        ("tab.my_children", "Çocuklarım", "My Children"),
        ("tab.classes", "Sınıflar", "Classes"),
        ("tab.announcements", "Duyurular", "Announcements"),
        ("tab.fees", "Aidatlar", "Fees"),
        ("tab.reports", "Gelişim Raporları", "Development Reports"),
        ("tab.inquiries", "Ön Kayıtlar", "Inquiries"),
        ("tab.applications", "Öğretmen Başvuruları", "Teacher Applications"),
        ("tab.attendance", "Yoklama", "Attendance"),
        ("tab.counseling", "Rehberlik", "Guidance"),
        ("tab.settings", "Ayarlar", "Settings"),
        // Search
        ("search.placeholder", "Sayfa, öğrenci veya duyuru ara...", "Search pages, children or announcements..."),
        ("search.no_results", "Sonuç bulunamadı", "No results found"),
        ("search.recent", "Son Aramalar", "Recent Searches"),
        ("search.popular", "Popüler Aramalar", "Popular Searches"),
        ("search.category.page", "Sayfa", "Page"),
        ("search.category.children", "Öğrenci", "Child"),
        ("search.category.announcements", "Duyuru", "Announcement"),
        ("search.no_class", "Sınıf atanmadı", "No class assigned"),
        ("search.announcement_description", "Duyuruyu görüntüle", "View announcement"),
        // Home page
        ("page.home.title", "Ref Akademi'ye Hoş Geldiniz", "Welcome to Ref Academy"),
        ("page.home.subtitle", "Çocuğunuzun doğal merakını Montessori yaklaşımıyla destekliyoruz.", "We nurture your child's natural curiosity with the Montessori approach."),
        ("page.home.method.heading", "Montessori Yöntemi", "The Montessori Method"),
        ("page.home.method.body", "Hazırlanmış çevrede, kendi hızında ve kendi seçimleriyle öğrenen çocuklar.", "Children learning at their own pace, through their own choices, in a prepared environment."),
        ("page.home.programs.heading", "Programlarımız", "Our Programs"),
        ("page.home.programs.body", "Yürümeye başlayanlar (18-36 ay), okul öncesi (3-6 yaş) ve ilkokul (6-9 yaş) programları.", "Toddler (18-36 months), primary (ages 3-6) and elementary (ages 6-9) programs."),
        ("page.home.visit.heading", "Okulumuzu Ziyaret Edin", "Visit Our School"),
        ("page.home.visit.body", "Ön kayıt formunu doldurun, sizi bir tanışma ziyaretine davet edelim.", "Fill in the inquiry form and we will invite you for an introductory visit."),
        // About page
        ("page.about.title", "Ref Akademi Hakkında", "About Ref Academy"),
        ("page.about.subtitle", "Bağımsız, özgüvenli ve meraklı bireyler yetiştiriyoruz.", "Raising independent, confident and curious individuals."),
        ("page.about.mission.heading", "Misyonumuz", "Our Mission"),
        ("page.about.mission.body", "Her çocuğun potansiyelini saygı ve sabırla ortaya çıkarmak.", "To bring out every child's potential with respect and patience."),
        ("page.about.team.heading", "Eğitim Kadromuz", "Our Educators"),
        ("page.about.team.body", "AMI ve AMS sertifikalı referans öğretmenlerimiz her sınıfta çocuklara rehberlik eder.", "Our AMI and AMS certified reference teachers guide the children in every classroom."),
        ("page.about.reports.heading", "Dönemsel Gelişim Raporları", "Periodic Development Reports"),
        ("page.about.reports.body", "Aileler, çocuklarının gelişimini her dönem ayrıntılı raporlarla takip eder.", "Families follow their child's progress through detailed reports every term."),
        // Contact page
        ("page.contact.title", "Bize Ulaşın", "Get in Touch"),
        ("page.contact.subtitle", "Sorularınız için bize her zaman ulaşabilirsiniz.", "Reach out to us any time with your questions."),
        ("page.contact.visit.heading", "Ziyaret", "Visits"),
        ("page.contact.visit.body", "Okul ziyaretleri randevu ile hafta içi yapılmaktadır.", "School visits take place on weekdays by appointment."),
        ("contact.address", "Adres", "Address"),
        ("contact.phone", "Telefon", "Phone"),
        ("contact.email", "E-posta", "Email"),
        ("contact.hours", "Çalışma Saatleri", "Opening Hours"),
        // Programs
        ("program.toddler", "Yürümeye Başlayanlar", "Toddler"),
        ("program.primary", "Okul Öncesi", "Primary"),
        ("program.elementary", "İlkokul", "Elementary"),
    ];

    entries.iter().map(|(key, tr, en)| (*key, (*tr, *en))).collect()
});

pub(super) fn lookup(key: &str) -> Option<(&'static str, &'static str)> {
    STRINGS.get(key).copied()
}
